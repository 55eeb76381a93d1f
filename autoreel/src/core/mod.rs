//! Core domain model types for autoreel.
//!
//! This module contains the value objects that flow through a run:
//! - The validated creative brief and its raw request form
//! - Stage identity
//! - Each stage's output and the aggregated pipeline result

mod brief;
mod output;
mod result;
mod stage;

pub use brief::{Brief, BriefRequest};
pub use output::{PublishMetadata, PublishOutput, RenderOutput, Script, ScriptSection, VisualPrompt};
pub use result::PipelineResult;
pub use stage::{StageName, StagePhase};
