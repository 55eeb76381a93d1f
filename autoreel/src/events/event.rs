//! Status event emitted at stage boundaries.

use serde::{Deserialize, Serialize};

use crate::core::{StageName, StagePhase};

/// A progress record emitted by the orchestrator.
///
/// Events are never mutated after emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    /// The stage the event belongs to.
    pub stage: StageName,
    /// Whether the stage is starting or has completed.
    pub phase: StagePhase,
    /// Human-readable progress or outcome description.
    pub detail: String,
    /// When the event was created (RFC 3339).
    pub timestamp: String,
}

impl StatusEvent {
    /// Creates a new event stamped with the current time.
    #[must_use]
    pub fn new(stage: StageName, phase: StagePhase, detail: impl Into<String>) -> Self {
        Self {
            stage,
            phase,
            detail: detail.into(),
            timestamp: crate::utils::iso_timestamp(),
        }
    }

    /// Creates a stage-start event.
    #[must_use]
    pub fn started(stage: StageName, detail: impl Into<String>) -> Self {
        Self::new(stage, StagePhase::Started, detail)
    }

    /// Creates a stage-completion event.
    #[must_use]
    pub fn completed(stage: StageName, detail: impl Into<String>) -> Self {
        Self::new(stage, StagePhase::Completed, detail)
    }

    /// Returns true for a start event.
    #[must_use]
    pub fn is_start(&self) -> bool {
        self.phase == StagePhase::Started
    }

    /// Compact `stage:phase` label, e.g. `render:started`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}:{}", self.stage.as_str(), self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_started_event() {
        let event = StatusEvent::started(StageName::Script, "Drafting script");
        assert_eq!(event.stage, StageName::Script);
        assert!(event.is_start());
        assert_eq!(event.label(), "script:started");
    }

    #[test]
    fn test_completed_event() {
        let event = StatusEvent::completed(StageName::Publish, "Published");
        assert!(!event.is_start());
        assert_eq!(event.label(), "publish:completed");
    }

    #[test]
    fn test_event_serialization() {
        let event = StatusEvent::started(StageName::Render, "Rendering 4 scenes");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["stage"], "render");
        assert_eq!(json["phase"], "started");
        assert_eq!(json["detail"], "Rendering 4 scenes");
        assert!(json["timestamp"].is_string());

        let back: StatusEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
