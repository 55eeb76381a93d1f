//! Status sink trait and implementations.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, Level};

use super::StatusEvent;
use crate::errors::SinkError;

/// Write-only append target for status events.
///
/// Implementations must accept events in call order and should return
/// promptly. A returned error is reported back to the orchestrator, which
/// logs it and carries on: a broken status channel never fails a run.
#[async_trait]
pub trait StatusSink: Send + Sync {
    /// Appends one event.
    async fn emit(&self, event: StatusEvent) -> Result<(), SinkError>;
}

#[async_trait]
impl<S: StatusSink + ?Sized> StatusSink for Arc<S> {
    async fn emit(&self, event: StatusEvent) -> Result<(), SinkError> {
        (**self).emit(event).await
    }
}

/// A sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStatusSink;

#[async_trait]
impl StatusSink for NoOpStatusSink {
    async fn emit(&self, _event: StatusEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

/// A sink that logs events using the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingStatusSink {
    level: Level,
}

impl Default for LoggingStatusSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingStatusSink {
    /// Creates a new logging sink with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }
}

#[async_trait]
impl StatusSink for LoggingStatusSink {
    async fn emit(&self, event: StatusEvent) -> Result<(), SinkError> {
        if self.level == Level::DEBUG {
            debug!(
                stage = %event.stage.as_str(),
                phase = %event.phase,
                detail = %event.detail,
                "Status: {}", event.label()
            );
        } else {
            info!(
                stage = %event.stage.as_str(),
                phase = %event.phase,
                detail = %event.detail,
                "Status: {}", event.label()
            );
        }
        Ok(())
    }
}

/// An in-memory sink that keeps every event in arrival order.
///
/// This is what the transport endpoint hands to each run so it can return
/// the full timeline whatever the outcome.
#[derive(Debug, Default)]
pub struct BufferedStatusSink {
    events: Mutex<Vec<StatusEvent>>,
}

impl BufferedStatusSink {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events collected so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<StatusEvent> {
        self.events.lock().clone()
    }

    /// Consumes the buffer, returning its events.
    #[must_use]
    pub fn into_events(self) -> Vec<StatusEvent> {
        self.events.into_inner()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Returns the `stage:phase` labels of the collected events.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.events.lock().iter().map(StatusEvent::label).collect()
    }
}

#[async_trait]
impl StatusSink for BufferedStatusSink {
    async fn emit(&self, event: StatusEvent) -> Result<(), SinkError> {
        self.events.lock().push(event);
        Ok(())
    }
}

/// Fans each event out to several sinks.
///
/// Every inner sink receives every event even if an earlier one fails; the
/// first error encountered is returned.
#[derive(Default, Clone)]
pub struct TeeStatusSink {
    sinks: Vec<Arc<dyn StatusSink>>,
}

impl std::fmt::Debug for TeeStatusSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeeStatusSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl TeeStatusSink {
    /// Creates an empty tee.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a downstream sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

#[async_trait]
impl StatusSink for TeeStatusSink {
    async fn emit(&self, event: StatusEvent) -> Result<(), SinkError> {
        let results = futures::future::join_all(
            self.sinks.iter().map(|sink| sink.emit(event.clone())),
        )
        .await;
        results.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageName;

    struct BrokenSink;

    #[async_trait]
    impl StatusSink for BrokenSink {
        async fn emit(&self, _event: StatusEvent) -> Result<(), SinkError> {
            Err(SinkError::Other("socket reset".into()))
        }
    }

    #[tokio::test]
    async fn test_noop_sink() {
        let sink = NoOpStatusSink;
        assert!(sink
            .emit(StatusEvent::started(StageName::Script, "x"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_logging_sink() {
        let sink = LoggingStatusSink::debug();
        assert!(sink
            .emit(StatusEvent::completed(StageName::Render, "done"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_buffered_sink_preserves_order() {
        let sink = BufferedStatusSink::new();
        assert!(sink.is_empty());

        sink.emit(StatusEvent::started(StageName::Script, "a")).await.unwrap();
        sink.emit(StatusEvent::completed(StageName::Script, "b")).await.unwrap();
        sink.emit(StatusEvent::started(StageName::Prompt, "c")).await.unwrap();

        assert_eq!(sink.len(), 3);
        assert_eq!(
            sink.labels(),
            vec!["script:started", "script:completed", "prompt:started"]
        );
        let details: Vec<String> = sink.into_events().into_iter().map(|e| e.detail).collect();
        assert_eq!(details, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_arc_sink_delegates() {
        let sink = Arc::new(BufferedStatusSink::new());
        let erased: Arc<dyn StatusSink> = sink.clone();

        erased.emit(StatusEvent::started(StageName::Publish, "x")).await.unwrap();
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn test_tee_delivers_despite_failure() {
        let buffer = Arc::new(BufferedStatusSink::new());
        let tee = TeeStatusSink::new()
            .with_sink(Arc::new(BrokenSink))
            .with_sink(buffer.clone());

        let result = tee.emit(StatusEvent::started(StageName::Script, "x")).await;

        assert_eq!(result, Err(SinkError::Other("socket reset".into())));
        assert_eq!(buffer.len(), 1);
    }
}
