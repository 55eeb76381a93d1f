//! # Autoreel
//!
//! Turns a short creative brief into a published video by running four
//! production stages in sequence:
//!
//! - **Script**: write a structured script from the brief
//! - **Prompt**: derive one visual prompt per script section
//! - **Render**: render the visuals into a video
//! - **Publish**: publish the render with listing metadata
//!
//! Each stage is a swappable adapter trait. The orchestrator reports
//! progress through a caller-supplied status sink and stops at the first
//! failing stage, attributing the failure and keeping the partial timeline.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use autoreel::prelude::*;
//!
//! # async fn demo() -> Result<(), AutoreelError> {
//! let pipeline = Pipeline::offline();
//! let sink = BufferedStatusSink::new();
//!
//! let request = BriefRequest::new(
//!     "AI automation for video creators",
//!     "Busy YouTubers",
//!     "Educate on automation",
//! )
//! .with_duration_seconds(120);
//!
//! let result = pipeline.run_request(request, &sink).await?;
//! println!("{} ({} events)", result.youtube_video_url(), sink.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod pipeline;
pub mod stages;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{build_adapters, BackendConfig, BackendMode, PipelineConfig};
    pub use crate::core::{
        Brief, BriefRequest, PipelineResult, PublishMetadata, PublishOutput, RenderOutput,
        Script, ScriptSection, StageName, StagePhase, VisualPrompt,
    };
    pub use crate::errors::{
        AdapterError, AutoreelError, BriefValidationError, ConfigError, SinkError, StageFailure,
    };
    pub use crate::events::{
        BufferedStatusSink, ChannelStatusSink, LoggingStatusSink, NoOpStatusSink, StatusEvent,
        StatusSink, TeeStatusSink,
    };
    pub use crate::pipeline::Pipeline;
    pub use crate::stages::{
        PromptDesigner, Publisher, Renderer, RetryConfig, Scriptwriter, StageAdapters,
    };
    pub use crate::utils::{generate_run_id, iso_timestamp};
}
