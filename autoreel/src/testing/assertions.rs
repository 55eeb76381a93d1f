//! Test assertions for status timelines.

use crate::core::{StageName, StagePhase};
use crate::events::StatusEvent;

/// Asserts that `events` carry exactly the `stage:phase` labels in `expected`.
pub fn assert_timeline(events: &[StatusEvent], expected: &[&str]) {
    let actual: Vec<String> = events.iter().map(StatusEvent::label).collect();
    assert_eq!(
        actual, expected,
        "Unexpected status timeline: got {actual:?}, expected {expected:?}"
    );
}

/// Asserts the eight-event timeline of a successful run.
pub fn assert_full_timeline(events: &[StatusEvent]) {
    let expected = labels_until(None);
    let expected: Vec<&str> = expected.iter().map(String::as_str).collect();
    assert_timeline(events, &expected);
}

/// Labels a run emits when `failed` is the first failing stage, or a full
/// successful run when `failed` is `None`.
#[must_use]
pub fn labels_until(failed: Option<StageName>) -> Vec<String> {
    let mut labels = Vec::with_capacity(StageName::ALL.len() * 2);
    for stage in StageName::ALL {
        labels.push(format!("{}:{}", stage.as_str(), StagePhase::Started));
        if Some(stage) == failed {
            break;
        }
        labels.push(format!("{}:{}", stage.as_str(), StagePhase::Completed));
    }
    labels
}
