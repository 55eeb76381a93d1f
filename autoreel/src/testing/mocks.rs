//! Deterministic adapters and sinks for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::fixtures::{sample_prompts, sample_script};
use crate::core::{
    Brief, PublishMetadata, PublishOutput, RenderOutput, Script, StageName, VisualPrompt,
};
use crate::errors::{AdapterError, SinkError};
use crate::events::{StatusEvent, StatusSink};
use crate::stages::{PromptDesigner, Publisher, Renderer, Scriptwriter, StageAdapters};

/// Scriptwriter that always returns the same script.
#[derive(Debug, Clone)]
pub struct StubScriptwriter(pub Script);

#[async_trait]
impl Scriptwriter for StubScriptwriter {
    async fn write_script(&self, _brief: &Brief) -> Result<Script, AdapterError> {
        Ok(self.0.clone())
    }
}

/// Prompt designer that always returns the same prompts.
#[derive(Debug, Clone)]
pub struct StubPromptDesigner(pub Vec<VisualPrompt>);

#[async_trait]
impl PromptDesigner for StubPromptDesigner {
    async fn design_prompts(&self, _script: &Script) -> Result<Vec<VisualPrompt>, AdapterError> {
        Ok(self.0.clone())
    }
}

/// Renderer that always returns the same output.
#[derive(Debug, Clone)]
pub struct StubRenderer(pub RenderOutput);

#[async_trait]
impl Renderer for StubRenderer {
    async fn render(
        &self,
        _prompts: &[VisualPrompt],
        _script: &Script,
    ) -> Result<RenderOutput, AdapterError> {
        Ok(self.0.clone())
    }
}

/// Publisher that always returns the same output.
#[derive(Debug, Clone)]
pub struct StubPublisher(pub PublishOutput);

#[async_trait]
impl Publisher for StubPublisher {
    async fn publish(
        &self,
        _render: &RenderOutput,
        _brief: &Brief,
    ) -> Result<PublishOutput, AdapterError> {
        Ok(self.0.clone())
    }
}

/// Four stub adapters echoing fixed, mutually consistent outputs.
#[must_use]
pub fn stub_adapters() -> StageAdapters {
    let script = sample_script();
    let prompts = sample_prompts(&script);
    StageAdapters::new(
        Arc::new(StubScriptwriter(script)),
        Arc::new(StubPromptDesigner(prompts)),
        Arc::new(StubRenderer(RenderOutput {
            video_download_url: "https://cdn.autoreel.test/renders/sample.mp4".into(),
        })),
        Arc::new(StubPublisher(PublishOutput {
            youtube_video_url: "https://www.youtube.com/watch?v=sample00001".into(),
            metadata: PublishMetadata {
                tags: vec!["automation".into(), "youtube".into()],
            },
        })),
    )
}

type ErrorFactory = Arc<dyn Fn() -> AdapterError + Send + Sync>;

/// An adapter that fails every call, usable for any stage.
#[derive(Clone)]
pub struct FailingStage {
    make_error: ErrorFactory,
    calls: Arc<AtomicUsize>,
}

impl std::fmt::Debug for FailingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailingStage")
            .field("calls", &self.calls())
            .finish_non_exhaustive()
    }
}

impl FailingStage {
    /// Fails with whatever `make_error` returns.
    #[must_use]
    pub fn new<F>(make_error: F) -> Self
    where
        F: Fn() -> AdapterError + Send + Sync + 'static,
    {
        Self {
            make_error: Arc::new(make_error),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fails with a timeout.
    #[must_use]
    pub fn timeout() -> Self {
        Self::new(|| AdapterError::timeout("backend did not answer in time"))
    }

    /// Fails with a quota error.
    #[must_use]
    pub fn quota() -> Self {
        Self::new(|| AdapterError::quota_exceeded("daily upload limit reached"))
    }

    /// Fails with a rejection.
    #[must_use]
    pub fn rejected(reason: &'static str) -> Self {
        Self::new(move || AdapterError::rejected(reason))
    }

    /// Number of calls received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err((self.make_error)())
    }
}

#[async_trait]
impl Scriptwriter for FailingStage {
    async fn write_script(&self, _brief: &Brief) -> Result<Script, AdapterError> {
        self.fail()
    }
}

#[async_trait]
impl PromptDesigner for FailingStage {
    async fn design_prompts(&self, _script: &Script) -> Result<Vec<VisualPrompt>, AdapterError> {
        self.fail()
    }
}

#[async_trait]
impl Renderer for FailingStage {
    async fn render(
        &self,
        _prompts: &[VisualPrompt],
        _script: &Script,
    ) -> Result<RenderOutput, AdapterError> {
        self.fail()
    }
}

#[async_trait]
impl Publisher for FailingStage {
    async fn publish(
        &self,
        _render: &RenderOutput,
        _brief: &Brief,
    ) -> Result<PublishOutput, AdapterError> {
        self.fail()
    }
}

/// Shared record of which stages were invoked, in call order.
#[derive(Debug, Default)]
pub struct CallLog {
    calls: Mutex<Vec<StageName>>,
}

impl CallLog {
    fn record(&self, stage: StageName) {
        self.calls.lock().push(stage);
    }

    /// All recorded calls.
    #[must_use]
    pub fn calls(&self) -> Vec<StageName> {
        self.calls.lock().clone()
    }
}

struct Counting<A: ?Sized> {
    log: Arc<CallLog>,
    inner: Arc<A>,
}

#[async_trait]
impl<A: Scriptwriter + ?Sized> Scriptwriter for Counting<A> {
    async fn write_script(&self, brief: &Brief) -> Result<Script, AdapterError> {
        self.log.record(StageName::Script);
        self.inner.write_script(brief).await
    }
}

#[async_trait]
impl<A: PromptDesigner + ?Sized> PromptDesigner for Counting<A> {
    async fn design_prompts(&self, script: &Script) -> Result<Vec<VisualPrompt>, AdapterError> {
        self.log.record(StageName::Prompt);
        self.inner.design_prompts(script).await
    }
}

#[async_trait]
impl<A: Renderer + ?Sized> Renderer for Counting<A> {
    async fn render(
        &self,
        prompts: &[VisualPrompt],
        script: &Script,
    ) -> Result<RenderOutput, AdapterError> {
        self.log.record(StageName::Render);
        self.inner.render(prompts, script).await
    }
}

#[async_trait]
impl<A: Publisher + ?Sized> Publisher for Counting<A> {
    async fn publish(
        &self,
        render: &RenderOutput,
        brief: &Brief,
    ) -> Result<PublishOutput, AdapterError> {
        self.log.record(StageName::Publish);
        self.inner.publish(render, brief).await
    }
}

/// Wraps a set of adapters and records every stage invocation.
#[derive(Debug, Clone)]
pub struct CountingAdapters {
    adapters: StageAdapters,
    log: Arc<CallLog>,
}

impl CountingAdapters {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: StageAdapters) -> Self {
        let log = Arc::new(CallLog::default());
        let adapters = StageAdapters::new(
            Arc::new(Counting {
                log: log.clone(),
                inner: inner.scriptwriter,
            }),
            Arc::new(Counting {
                log: log.clone(),
                inner: inner.prompt_designer,
            }),
            Arc::new(Counting {
                log: log.clone(),
                inner: inner.renderer,
            }),
            Arc::new(Counting {
                log: log.clone(),
                inner: inner.publisher,
            }),
        );
        Self { adapters, log }
    }

    /// The wrapped adapters, to hand to a pipeline.
    #[must_use]
    pub fn adapters(&self) -> StageAdapters {
        self.adapters.clone()
    }

    /// Number of calls made to `stage`.
    #[must_use]
    pub fn count(&self, stage: StageName) -> usize {
        self.log.calls().iter().filter(|s| **s == stage).count()
    }

    /// Stages in the order they were invoked.
    #[must_use]
    pub fn calls(&self) -> Vec<StageName> {
        self.log.calls()
    }
}

/// A sink that rejects every event.
#[derive(Debug, Default)]
pub struct FailingSink {
    attempts: AtomicUsize,
}

impl FailingSink {
    /// Number of events offered to the sink.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusSink for FailingSink {
    async fn emit(&self, _event: StatusEvent) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::Other("connection reset by peer".into()))
    }
}

/// A sink that takes `delay` to accept each event.
#[derive(Debug, Clone)]
pub struct SlowSink {
    delay: Duration,
}

impl SlowSink {
    /// Creates a sink with the given per-event delay.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl StatusSink for SlowSink {
    async fn emit(&self, _event: StatusEvent) -> Result<(), SinkError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}
