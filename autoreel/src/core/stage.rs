//! Stage identity and lifecycle phase enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four ordered production steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    /// Writes the script from the brief.
    Script,
    /// Derives one visual prompt per script section.
    Prompt,
    /// Renders the video from the visual prompts.
    Render,
    /// Publishes the rendered video.
    Publish,
}

impl StageName {
    /// Every stage, in execution order.
    pub const ALL: [Self; 4] = [Self::Script, Self::Prompt, Self::Render, Self::Publish];

    /// Wire identifier (e.g., "script").
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Prompt => "prompt",
            Self::Render => "render",
            Self::Publish => "publish",
        }
    }

    /// Human-facing label (e.g., "Script").
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Script => "Script",
            Self::Prompt => "Prompt",
            Self::Render => "Render",
            Self::Publish => "Publish",
        }
    }

    /// Zero-based position in the pipeline.
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::Script => 0,
            Self::Prompt => 1,
            Self::Render => 2,
            Self::Publish => 3,
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where in its lifecycle a stage was when an event was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagePhase {
    /// Emitted immediately before the adapter is invoked.
    Started,
    /// Emitted immediately after the adapter succeeded.
    Completed,
}

impl fmt::Display for StagePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "started"),
            Self::Completed => write!(f, "completed"),
        }
    }
}
