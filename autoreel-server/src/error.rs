use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use autoreel::core::{StageName, StagePhase};
use autoreel::errors::{BriefValidationError, StageFailure};
use autoreel::events::StatusEvent;

use crate::envelope::PipelineEnvelope;

/// Application-level error type for HTTP handlers.
///
/// Every variant renders as a [`PipelineEnvelope`] with `ok: false`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The body could not be read as a brief.
    #[error("Malformed request: {message}")]
    MalformedRequest {
        /// Status chosen by the body extractor.
        status: StatusCode,
        /// Extractor message.
        message: String,
    },

    /// The brief failed validation. No stage ran.
    #[error(transparent)]
    Validation(#[from] BriefValidationError),

    /// A stage failed mid-run.
    #[error("{failure}")]
    Stage {
        /// The failure returned by the orchestrator.
        failure: StageFailure,
        /// Events collected by the request's sink.
        status_updates: Vec<StatusEvent>,
    },

    /// The run did not finish before the request deadline.
    #[error("Pipeline run exceeded the {deadline_secs}s request deadline")]
    RunTimeout {
        /// The deadline that elapsed.
        deadline_secs: u64,
        /// Events collected by the request's sink before the deadline.
        status_updates: Vec<StatusEvent>,
    },
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Wraps a stage failure together with the request's collected events.
    #[must_use]
    pub fn stage(failure: StageFailure, status_updates: Vec<StatusEvent>) -> Self {
        Self::Stage {
            failure,
            status_updates,
        }
    }

    /// Wraps an elapsed run deadline together with the events collected so far.
    #[must_use]
    pub fn run_timeout(deadline_secs: u64, status_updates: Vec<StatusEvent>) -> Self {
        Self::RunTimeout {
            deadline_secs,
            status_updates,
        }
    }

    /// The HTTP status this error renders with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedRequest { status, .. } => *status,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Stage { .. } => StatusCode::BAD_GATEWAY,
            Self::RunTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let envelope = match self {
            Self::MalformedRequest { message, .. } => {
                PipelineEnvelope::failure(message, "malformed_request", Vec::new())
            }
            Self::Validation(err) => {
                tracing::info!(error = %err, "Rejected invalid brief");
                let message = err.to_string();
                PipelineEnvelope::failure(message, "validation", Vec::new())
                    .with_field_errors(err.fields)
            }
            Self::Stage {
                failure,
                status_updates,
            } => {
                tracing::warn!(
                    stage = failure.stage.as_str(),
                    kind = failure.cause.kind(),
                    error = %failure,
                    "Pipeline run failed"
                );
                PipelineEnvelope::failure(failure.to_string(), failure.cause.kind(), status_updates)
                    .with_failed_stage(failure.stage)
            }
            Self::RunTimeout {
                deadline_secs,
                status_updates,
            } => {
                let message = format!("Pipeline run exceeded the {deadline_secs}s request deadline");
                let in_flight = stage_in_flight(&status_updates);
                tracing::warn!(
                    deadline_secs,
                    stage = in_flight.as_ref().map(StageName::as_str),
                    events = status_updates.len(),
                    "Pipeline run timed out"
                );
                let envelope = PipelineEnvelope::failure(message, "timeout", status_updates);
                match in_flight {
                    Some(stage) => envelope.with_failed_stage(stage),
                    None => envelope,
                }
            }
        };

        (status, Json(envelope)).into_response()
    }
}

/// The stage whose start event is the last one recorded, if any.
fn stage_in_flight(events: &[StatusEvent]) -> Option<StageName> {
    events
        .last()
        .filter(|e| e.phase == StagePhase::Started)
        .map(|e| e.stage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoreel::errors::{AdapterError, FieldError};

    #[test]
    fn test_status_codes() {
        let validation = ApiError::from(BriefValidationError::new(vec![FieldError::new(
            "topic", "length", "too short",
        )]));
        assert_eq!(validation.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let stage = ApiError::stage(
            StageFailure::new(StageName::Publish, AdapterError::quota_exceeded("daily"), vec![]),
            vec![],
        );
        assert_eq!(stage.status_code(), StatusCode::BAD_GATEWAY);
        assert!(stage.to_string().starts_with("Publish stage failed"));

        let timeout = ApiError::run_timeout(300, vec![]);
        assert_eq!(timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert!(timeout.to_string().contains("300s"));
    }

    #[test]
    fn test_stage_in_flight() {
        let events = vec![
            StatusEvent::started(StageName::Script, "a"),
            StatusEvent::completed(StageName::Script, "b"),
        ];
        assert_eq!(stage_in_flight(&events), None);

        let mut events = events;
        events.push(StatusEvent::started(StageName::Prompt, "c"));
        assert_eq!(stage_in_flight(&events), Some(StageName::Prompt));
        assert_eq!(stage_in_flight(&[]), None);
    }
}
