//! Stage adapter contracts and implementations.
//!
//! Each production step is a trait with a single async operation. The
//! orchestrator depends only on these traits, so backends can be swapped
//! (HTTP services, offline generators, test doubles) without touching the
//! sequencing logic. Adapters never see the status sink.

#[cfg(feature = "http")]
mod http;
mod offline;
mod retry;

#[cfg(feature = "http")]
pub use http::{HttpPromptDesigner, HttpPublisher, HttpRenderer, HttpScriptwriter, HttpStageClient};
pub use offline::{
    derive_tags, OfflinePromptDesigner, OfflinePublisher, OfflineRenderer, OfflineScriptwriter,
};
pub use retry::{
    should_retry, with_retry, BackoffStrategy, JitterStrategy, RetryConfig, RetryDecision,
    RetryState, Retrying,
};

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{BackendConfig, BackendMode};
use crate::core::{Brief, PublishOutput, RenderOutput, Script, VisualPrompt};
use crate::errors::{AdapterError, ConfigError};

/// Writes a script that satisfies a brief.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Scriptwriter: Send + Sync {
    /// Produces a script from the brief.
    async fn write_script(&self, brief: &Brief) -> Result<Script, AdapterError>;
}

/// Derives one visual prompt per script section.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PromptDesigner: Send + Sync {
    /// Produces prompts, in section order.
    async fn design_prompts(&self, script: &Script) -> Result<Vec<VisualPrompt>, AdapterError>;
}

/// Renders a video from visual prompts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Renders the prompts, using the script for pacing.
    async fn render(
        &self,
        prompts: &[VisualPrompt],
        script: &Script,
    ) -> Result<RenderOutput, AdapterError>;
}

/// Publishes a rendered video to the hosting platform.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publishes the render, using the brief for listing metadata.
    async fn publish(&self, render: &RenderOutput, brief: &Brief)
        -> Result<PublishOutput, AdapterError>;
}

#[async_trait]
impl<T: Scriptwriter + ?Sized> Scriptwriter for Arc<T> {
    async fn write_script(&self, brief: &Brief) -> Result<Script, AdapterError> {
        (**self).write_script(brief).await
    }
}

#[async_trait]
impl<T: PromptDesigner + ?Sized> PromptDesigner for Arc<T> {
    async fn design_prompts(&self, script: &Script) -> Result<Vec<VisualPrompt>, AdapterError> {
        (**self).design_prompts(script).await
    }
}

#[async_trait]
impl<T: Renderer + ?Sized> Renderer for Arc<T> {
    async fn render(
        &self,
        prompts: &[VisualPrompt],
        script: &Script,
    ) -> Result<RenderOutput, AdapterError> {
        (**self).render(prompts, script).await
    }
}

#[async_trait]
impl<T: Publisher + ?Sized> Publisher for Arc<T> {
    async fn publish(
        &self,
        render: &RenderOutput,
        brief: &Brief,
    ) -> Result<PublishOutput, AdapterError> {
        (**self).publish(render, brief).await
    }
}

/// The four adapters a pipeline runs, one per stage.
#[derive(Clone)]
pub struct StageAdapters {
    /// Script stage.
    pub scriptwriter: Arc<dyn Scriptwriter>,
    /// Prompt stage.
    pub prompt_designer: Arc<dyn PromptDesigner>,
    /// Render stage.
    pub renderer: Arc<dyn Renderer>,
    /// Publish stage.
    pub publisher: Arc<dyn Publisher>,
}

impl std::fmt::Debug for StageAdapters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageAdapters").finish_non_exhaustive()
    }
}

impl StageAdapters {
    /// Bundles four adapters.
    #[must_use]
    pub fn new(
        scriptwriter: Arc<dyn Scriptwriter>,
        prompt_designer: Arc<dyn PromptDesigner>,
        renderer: Arc<dyn Renderer>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            scriptwriter,
            prompt_designer,
            renderer,
            publisher,
        }
    }

    /// Deterministic adapters that make no network calls.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(
            Arc::new(OfflineScriptwriter::default()),
            Arc::new(OfflinePromptDesigner::default()),
            Arc::new(OfflineRenderer::default()),
            Arc::new(OfflinePublisher::default()),
        )
    }

    /// Wraps every adapter so retryable failures are retried per `config`.
    #[must_use]
    pub fn with_retry(self, config: &RetryConfig) -> Self {
        Self {
            scriptwriter: Arc::new(Retrying::new(self.scriptwriter, config.clone())),
            prompt_designer: Arc::new(Retrying::new(self.prompt_designer, config.clone())),
            renderer: Arc::new(Retrying::new(self.renderer, config.clone())),
            publisher: Arc::new(Retrying::new(self.publisher, config.clone())),
        }
    }

    /// Builds adapters for the configured backend.
    ///
    /// Retry wrapping is applied when `config.retry.max_attempts > 1`.
    pub fn from_config(config: &BackendConfig) -> Result<Self, ConfigError> {
        let adapters = match config.mode {
            BackendMode::Offline => Self::offline(),
            BackendMode::Http => Self::http(config)?,
        };

        if config.retry.max_attempts > 1 {
            Ok(adapters.with_retry(&config.retry))
        } else {
            Ok(adapters)
        }
    }

    #[cfg(feature = "http")]
    fn http(config: &BackendConfig) -> Result<Self, ConfigError> {
        let endpoints = config.endpoints()?;
        Ok(Self::new(
            Arc::new(HttpScriptwriter::new(HttpStageClient::new(
                endpoints.scriptwriter,
                config,
            )?)),
            Arc::new(HttpPromptDesigner::new(HttpStageClient::new(
                endpoints.prompt_designer,
                config,
            )?)),
            Arc::new(HttpRenderer::new(HttpStageClient::new(endpoints.renderer, config)?)),
            Arc::new(HttpPublisher::new(HttpStageClient::new(endpoints.publisher, config)?)),
        ))
    }

    #[cfg(not(feature = "http"))]
    fn http(_config: &BackendConfig) -> Result<Self, ConfigError> {
        Err(ConfigError::invalid(
            "AUTOREEL_BACKEND",
            "http",
            "built without the `http` feature",
        ))
    }
}
