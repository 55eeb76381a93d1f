//! Sequential brief-to-video orchestrator.

use std::time::{Duration, Instant};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::contracts::{check_prompts, check_publish, check_render, check_script};
use crate::config::PipelineConfig;
use crate::core::{Brief, BriefRequest, PipelineResult, StageName};
use crate::errors::{AdapterError, AutoreelError, SinkError, StageFailure};
use crate::events::{StatusEvent, StatusSink};
use crate::stages::StageAdapters;
use crate::utils::{elapsed_ms, generate_run_id};

/// Runs Script, Prompt, Render and Publish in order for one brief.
///
/// A `Pipeline` holds no per-run state, so one instance can serve any
/// number of concurrent runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    adapters: StageAdapters,
    config: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline over the given adapters.
    #[must_use]
    pub fn new(adapters: StageAdapters, config: PipelineConfig) -> Self {
        Self { adapters, config }
    }

    /// A pipeline over the offline adapters with default settings.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(StageAdapters::offline(), PipelineConfig::default())
    }

    /// The orchestrator settings.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The stage adapters.
    #[must_use]
    pub fn adapters(&self) -> &StageAdapters {
        &self.adapters
    }

    /// Runs all four stages for `brief`, reporting progress to `sink`.
    ///
    /// Each stage gets a `started` event right before its adapter is
    /// called and a `completed` event right after it succeeds. The first
    /// failing stage ends the run; events already emitted stay in the sink
    /// and are also carried on the returned [`StageFailure`]. Sink errors
    /// are logged and otherwise ignored.
    pub async fn run(
        &self,
        brief: &Brief,
        sink: &dyn StatusSink,
    ) -> Result<PipelineResult, StageFailure> {
        let run_id = generate_run_id();
        let span = info_span!("pipeline.run", %run_id, topic = %brief.topic());
        self.execute(run_id, brief, sink).instrument(span).await
    }

    /// Validates a raw request, then runs it.
    ///
    /// Invalid requests fail before any event is emitted.
    pub async fn run_request(
        &self,
        request: BriefRequest,
        sink: &dyn StatusSink,
    ) -> Result<PipelineResult, AutoreelError> {
        let brief = Brief::from_request(request)?;
        Ok(self.run(&brief, sink).await?)
    }

    async fn execute(
        &self,
        run_id: Uuid,
        brief: &Brief,
        sink: &dyn StatusSink,
    ) -> Result<PipelineResult, StageFailure> {
        let started = Instant::now();
        let mut run = RunRecorder::new(sink, self.config.sink_timeout());
        info!(fingerprint = %brief.fingerprint(), "Pipeline run started");

        let outcome = self.stages(brief, &mut run).await;
        let duration_ms = elapsed_ms(started);
        match &outcome {
            Ok(_) => info!(
                %run_id,
                duration_ms,
                stages = %run.timings_summary(),
                "Pipeline run completed"
            ),
            Err(failure) => error!(
                %run_id,
                duration_ms,
                failed_stage = %failure.stage,
                kind = failure.cause.kind(),
                events = failure.timeline.len(),
                stages = %run.timings_summary(),
                "Pipeline run failed"
            ),
        }
        outcome
    }

    async fn stages(
        &self,
        brief: &Brief,
        run: &mut RunRecorder<'_>,
    ) -> Result<PipelineResult, StageFailure> {
        let adapters = &self.adapters;

        run.started(StageName::Script, format!("Writing script for \"{}\"", brief.topic()))
            .await;
        let outcome = adapters.scriptwriter.write_script(brief).await;
        let script = run.settle(StageName::Script, outcome, check_script)?;
        run.completed(
            StageName::Script,
            format!(
                "Script ready: {} sections, {}s",
                script.sections.len(),
                script.total_duration_seconds()
            ),
        )
        .await;

        run.started(
            StageName::Prompt,
            format!("Designing visuals for {} sections", script.sections.len()),
        )
        .await;
        let outcome = adapters.prompt_designer.design_prompts(&script).await;
        let prompts = run.settle(StageName::Prompt, outcome, |p| check_prompts(&script, p))?;
        run.completed(
            StageName::Prompt,
            format!("{} visual prompts ready", prompts.len()),
        )
        .await;

        run.started(StageName::Render, format!("Rendering {} scenes", prompts.len()))
            .await;
        let outcome = adapters.renderer.render(&prompts, &script).await;
        let render = run.settle(StageName::Render, outcome, check_render)?;
        run.completed(
            StageName::Render,
            format!("Video rendered: {}", render.video_download_url),
        )
        .await;

        run.started(StageName::Publish, "Publishing video").await;
        let outcome = adapters.publisher.publish(&render, brief).await;
        let publish = run.settle(StageName::Publish, outcome, check_publish)?;
        run.completed(
            StageName::Publish,
            format!("Published: {}", publish.youtube_video_url),
        )
        .await;

        Ok(PipelineResult::assemble(script, prompts, render, publish))
    }
}

/// Per-run bookkeeping: the emitted timeline and stage timings.
struct RunRecorder<'a> {
    sink: &'a dyn StatusSink,
    sink_timeout: Duration,
    timeline: Vec<StatusEvent>,
    timings: Vec<(StageName, f64)>,
    stage_started: Option<Instant>,
}

impl<'a> RunRecorder<'a> {
    fn new(sink: &'a dyn StatusSink, sink_timeout: Duration) -> Self {
        Self {
            sink,
            sink_timeout,
            timeline: Vec::with_capacity(StageName::ALL.len() * 2),
            timings: Vec::with_capacity(StageName::ALL.len()),
            stage_started: None,
        }
    }

    async fn started(&mut self, stage: StageName, detail: impl Into<String>) {
        debug!(stage = stage.as_str(), "Stage started");
        self.emit(StatusEvent::started(stage, detail)).await;
        self.stage_started = Some(Instant::now());
    }

    async fn completed(&mut self, stage: StageName, detail: impl Into<String>) {
        let duration_ms = self.timings.last().map_or(0.0, |(_, ms)| *ms);
        info!(stage = stage.as_str(), duration_ms, "Stage completed");
        self.emit(StatusEvent::completed(stage, detail)).await;
    }

    /// Records the stage duration and turns an adapter error or contract
    /// violation into a [`StageFailure`].
    fn settle<T, F>(
        &mut self,
        stage: StageName,
        outcome: Result<T, AdapterError>,
        check: F,
    ) -> Result<T, StageFailure>
    where
        F: FnOnce(&T) -> Result<(), AdapterError>,
    {
        let duration_ms = self.stage_started.take().map_or(0.0, elapsed_ms);
        self.timings.push((stage, duration_ms));

        match outcome.and_then(|value| check(&value).map(|()| value)) {
            Ok(value) => Ok(value),
            Err(cause) => {
                warn!(
                    stage = stage.as_str(),
                    kind = cause.kind(),
                    retryable = cause.is_retryable(),
                    duration_ms,
                    error = %cause,
                    "Stage failed"
                );
                Err(StageFailure::new(stage, cause, std::mem::take(&mut self.timeline)))
            }
        }
    }

    async fn emit(&mut self, event: StatusEvent) {
        let label = event.label();
        self.timeline.push(event.clone());

        let result = match tokio::time::timeout(self.sink_timeout, self.sink.emit(event)).await {
            Ok(result) => result,
            Err(_) => Err(SinkError::Timeout(
                u64::try_from(self.sink_timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        };

        if let Err(err) = result {
            warn!(event = %label, error = %err, "Status sink failed; continuing run");
        }
    }

    fn timings_summary(&self) -> String {
        self.timings
            .iter()
            .map(|(stage, ms)| format!("{}={ms:.1}ms", stage.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }
}
