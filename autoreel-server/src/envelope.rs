//! JSON envelope returned by the pipeline endpoint.

use serde::Serialize;

use autoreel::core::{PipelineResult, StageName};
use autoreel::errors::FieldError;
use autoreel::events::StatusEvent;

/// Response body for `POST /api/pipeline`, whatever the outcome.
///
/// `status_updates` always holds every event the run emitted, so a failed
/// run still shows how far it got.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineEnvelope {
    /// Whether the run produced a result.
    pub ok: bool,
    /// The result of a successful run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<PipelineResult>,
    /// Error description of a failed request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    /// The stage that failed, for stage failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<StageName>,
    /// Field problems, for validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
    /// Every status event emitted before the response was built.
    pub status_updates: Vec<StatusEvent>,
}

impl PipelineEnvelope {
    /// Envelope for a successful run.
    #[must_use]
    pub fn success(result: PipelineResult, status_updates: Vec<StatusEvent>) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
            error_kind: None,
            failed_stage: None,
            field_errors: Vec::new(),
            status_updates,
        }
    }

    /// Envelope for a failed request.
    #[must_use]
    pub fn failure(
        error: impl Into<String>,
        error_kind: impl Into<String>,
        status_updates: Vec<StatusEvent>,
    ) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(error.into()),
            error_kind: Some(error_kind.into()),
            failed_stage: None,
            field_errors: Vec::new(),
            status_updates,
        }
    }

    /// Attaches the failing stage.
    #[must_use]
    pub fn with_failed_stage(mut self, stage: StageName) -> Self {
        self.failed_stage = Some(stage);
        self
    }

    /// Attaches field-level validation problems.
    #[must_use]
    pub fn with_field_errors(mut self, fields: Vec<FieldError>) -> Self {
        self.field_errors = fields;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_envelope_shape() {
        let envelope = PipelineEnvelope::failure("Render stage failed: Timed out: 30s", "timeout", vec![])
            .with_failed_stage(StageName::Render);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["ok"], false);
        assert_eq!(json["failedStage"], "render");
        assert_eq!(json["errorKind"], "timeout");
        assert!(json["statusUpdates"].as_array().unwrap().is_empty());
        assert!(json.get("result").is_none());
        assert!(json.get("fieldErrors").is_none());
    }
}
