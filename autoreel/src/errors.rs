//! Error types for the autoreel pipeline.
//!
//! The taxonomy has three tiers: validation errors raised at the brief
//! boundary, stage failures raised by the orchestrator when an adapter
//! fails, and sink errors that the orchestrator isolates and never
//! propagates.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::core::StageName;
use crate::events::StatusEvent;

/// The top-level error type for autoreel operations.
#[derive(Debug, Error)]
pub enum AutoreelError {
    /// The brief failed validation and the pipeline never ran.
    #[error("{0}")]
    Validation(#[from] BriefValidationError),

    /// A pipeline stage failed.
    #[error("{0}")]
    Stage(#[from] StageFailure),

    /// Configuration could not be loaded.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// Error signalled by a stage adapter.
///
/// Adapters are remote-service backed, so the variants mirror the ways a
/// backend call goes wrong. The orchestrator treats all of them uniformly.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The backend did not answer in time.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// The request never reached the backend (DNS, connect, TLS, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend refused the request (auth, policy, bad input).
    #[error("Rejected: {reason}")]
    Rejected {
        /// Why the backend refused.
        reason: String,
    },

    /// The backend refused because a quota or rate limit was hit.
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The backend answered with something that could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The stage output broke an invariant the next stage depends on.
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// Any other failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AdapterError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a rejection error.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Creates a quota error.
    #[must_use]
    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::QuotaExceeded(message.into())
    }

    /// Creates an invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Creates a contract violation error.
    #[must_use]
    pub fn contract_violation(message: impl Into<String>) -> Self {
        Self::ContractViolation(message.into())
    }

    /// Short machine-readable name of the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Transport(_) => "transport",
            Self::Rejected { .. } => "rejected",
            Self::QuotaExceeded(_) => "quota_exceeded",
            Self::InvalidResponse(_) => "invalid_response",
            Self::ContractViolation(_) => "contract_violation",
            Self::Other(_) => "other",
        }
    }

    /// Returns true if retrying the same call could plausibly succeed.
    ///
    /// Only consulted by adapter-level retry wrappers; the orchestrator
    /// never retries.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Transport(_) | Self::QuotaExceeded(_)
        )
    }
}

/// Terminal error raised when a stage adapter fails.
///
/// Carries the failing stage, the adapter's cause, and every status event
/// the orchestrator emitted before the failure, so the three always travel
/// together across the transport boundary.
#[derive(Debug, Error)]
#[error("{stage} stage failed: {cause}")]
pub struct StageFailure {
    /// The stage whose adapter failed.
    pub stage: StageName,
    /// The underlying adapter error.
    #[source]
    pub cause: AdapterError,
    /// Events emitted by the run up to and including the failing stage's start.
    pub timeline: Vec<StatusEvent>,
}

impl StageFailure {
    /// Creates a new stage failure.
    #[must_use]
    pub fn new(stage: StageName, cause: AdapterError, timeline: Vec<StatusEvent>) -> Self {
        Self {
            stage,
            cause,
            timeline,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("stage".to_string(), serde_json::json!(self.stage.as_str()));
        map.insert("kind".to_string(), serde_json::json!(self.cause.kind()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map.insert("events".to_string(), serde_json::json!(self.timeline.len()));
        map
    }
}

/// Error returned by a status sink.
///
/// The orchestrator logs and swallows these; they never abort a run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    /// The receiving side has gone away.
    #[error("Status channel closed")]
    Closed,

    /// The sink has no room for more events.
    #[error("Status channel full")]
    Full,

    /// The sink did not accept the event within the allotted time.
    #[error("Status sink timed out after {0}ms")]
    Timeout(u64),

    /// Any other sink failure.
    #[error("Status sink error: {0}")]
    Other(String),
}

/// A single field-level validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The offending field, in wire (camelCase) form.
    pub field: String,
    /// Machine-readable code (e.g., "length", "range").
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    /// Creates a new field error.
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Error raised when a raw brief fails validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid brief: {}", join_fields(.fields))]
pub struct BriefValidationError {
    /// Every field that failed, sorted by field name.
    pub fields: Vec<FieldError>,
}

impl BriefValidationError {
    /// Creates a validation error from field errors.
    #[must_use]
    pub fn new(mut fields: Vec<FieldError>) -> Self {
        fields.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
        Self { fields }
    }

    /// Returns true if the named field failed.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while loading configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A required setting was absent.
    #[error("Missing configuration: {0}")]
    Missing(String),

    /// A setting was present but could not be used.
    #[error("Invalid configuration for {key}: '{value}' ({reason})")]
    Invalid {
        /// The setting name.
        key: String,
        /// The raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Creates an invalid-value error.
    #[must_use]
    pub fn invalid(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Invalid {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_error_kind() {
        assert_eq!(AdapterError::timeout("30s").kind(), "timeout");
        assert_eq!(AdapterError::rejected("policy").kind(), "rejected");
        assert_eq!(AdapterError::quota_exceeded("daily").kind(), "quota_exceeded");
        assert_eq!(
            AdapterError::Other(anyhow::anyhow!("boom")).kind(),
            "other"
        );
    }

    #[test]
    fn test_adapter_error_retryable() {
        assert!(AdapterError::timeout("slow").is_retryable());
        assert!(AdapterError::transport("dns").is_retryable());
        assert!(AdapterError::quota_exceeded("429").is_retryable());
        assert!(!AdapterError::rejected("unauthorized").is_retryable());
        assert!(!AdapterError::invalid_response("not json").is_retryable());
        assert!(!AdapterError::contract_violation("count").is_retryable());
    }

    #[test]
    fn test_stage_failure_display_and_source() {
        use std::error::Error as _;

        let failure = StageFailure::new(
            StageName::Publish,
            AdapterError::quota_exceeded("daily upload limit"),
            Vec::new(),
        );

        assert_eq!(
            failure.to_string(),
            "Publish stage failed: Quota exceeded: daily upload limit"
        );
        let source = failure.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("Quota exceeded: daily upload limit"));
    }

    #[test]
    fn test_stage_failure_to_dict() {
        let failure = StageFailure::new(
            StageName::Render,
            AdapterError::timeout("render farm"),
            Vec::new(),
        );
        let dict = failure.to_dict();

        assert_eq!(dict.get("stage").unwrap(), "render");
        assert_eq!(dict.get("kind").unwrap(), "timeout");
        assert_eq!(dict.get("events").unwrap(), 0);
    }

    #[test]
    fn test_brief_validation_error_sorted_and_displayed() {
        let err = BriefValidationError::new(vec![
            FieldError::new("topic", "length", "must be at least 3 characters"),
            FieldError::new("durationSeconds", "range", "must be between 30 and 300"),
        ]);

        assert_eq!(err.fields[0].field, "durationSeconds");
        assert!(err.has_field("topic"));
        assert!(!err.has_field("tone"));
        assert_eq!(
            err.to_string(),
            "Invalid brief: durationSeconds: must be between 30 and 300; topic: must be at least 3 characters"
        );
    }

    #[test]
    fn test_autoreel_error_from_conversions() {
        let err: AutoreelError = ConfigError::Missing("AUTOREEL_RENDERER_URL".into()).into();
        assert!(matches!(err, AutoreelError::Config(_)));

        let err: AutoreelError = BriefValidationError::new(Vec::new()).into();
        assert!(matches!(err, AutoreelError::Validation(_)));
    }

    #[test]
    fn test_sink_error_display() {
        assert_eq!(SinkError::Timeout(250).to_string(), "Status sink timed out after 250ms");
        assert_eq!(SinkError::Closed.to_string(), "Status channel closed");
    }
}
