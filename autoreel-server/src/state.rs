use std::sync::Arc;
use std::time::Duration;

use autoreel::config::{build_adapters, BackendConfig, PipelineConfig};
use autoreel::errors::ConfigError;
use autoreel::pipeline::Pipeline;

/// Shared application state available to all handlers.
///
/// Only the pipeline is shared. Every request gets its own status sink,
/// so concurrent runs never see each other's events.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The orchestrator, shared across requests.
    pub pipeline: Arc<Pipeline>,
    /// How long one pipeline run may take before the handler gives up.
    pub run_deadline: Duration,
}

impl AppState {
    /// Wraps an existing pipeline.
    #[must_use]
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            run_deadline: Duration::from_secs(300),
        }
    }

    /// Overrides the per-run deadline.
    #[must_use]
    pub fn with_run_deadline(mut self, deadline: Duration) -> Self {
        self.run_deadline = deadline;
        self
    }

    /// Builds the pipeline from backend and orchestrator settings.
    pub fn from_config(
        backend: &BackendConfig,
        pipeline: PipelineConfig,
    ) -> Result<Self, ConfigError> {
        let adapters = build_adapters(backend)?;
        Ok(Self::new(Pipeline::new(adapters, pipeline)))
    }
}
