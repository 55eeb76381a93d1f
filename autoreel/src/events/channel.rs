//! Channel-backed status sink for streaming progress to a live consumer.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

use super::{StatusEvent, StatusSink};
use crate::errors::SinkError;

/// Delivery counters for a [`ChannelStatusSink`].
#[derive(Debug, Default)]
pub struct ChannelSinkMetrics {
    delivered: AtomicU64,
    dropped: AtomicU64,
}

impl ChannelSinkMetrics {
    /// Number of events handed to the receiver.
    #[must_use]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Number of events that could not be delivered.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Converts metrics to a dictionary.
    #[must_use]
    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::json!({
            "delivered": self.delivered(),
            "dropped": self.dropped(),
        })
    }
}

/// A sink that forwards events over a bounded tokio channel.
///
/// Never waits for capacity: a full or closed channel is reported as a
/// [`SinkError`] and the event is dropped.
#[derive(Debug, Clone)]
pub struct ChannelStatusSink {
    tx: mpsc::Sender<StatusEvent>,
    metrics: Arc<ChannelSinkMetrics>,
}

impl ChannelStatusSink {
    /// Creates a sink and the receiver that will observe its events.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<StatusEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let sink = Self {
            tx,
            metrics: Arc::new(ChannelSinkMetrics::default()),
        };
        (sink, rx)
    }

    /// Delivery counters.
    #[must_use]
    pub fn metrics(&self) -> Arc<ChannelSinkMetrics> {
        self.metrics.clone()
    }
}

#[async_trait]
impl StatusSink for ChannelStatusSink {
    async fn emit(&self, event: StatusEvent) -> Result<(), SinkError> {
        match self.tx.try_send(event) {
            Ok(()) => {
                self.metrics.delivered.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(event)) => {
                self.metrics.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(event = %event.label(), "Status channel full, dropping event");
                Err(SinkError::Full)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.metrics.dropped.fetch_add(1, Ordering::Relaxed);
                Err(SinkError::Closed)
            }
        }
    }
}
