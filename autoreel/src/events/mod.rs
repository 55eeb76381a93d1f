//! Status reporting for pipeline runs.
//!
//! The orchestrator pushes [`StatusEvent`]s into a caller-supplied
//! [`StatusSink`] at every stage boundary. Sinks decide how events are
//! stored or transmitted; the orchestrator only requires that they accept
//! events in call order.

mod channel;
mod event;
mod sink;

pub use channel::{ChannelStatusSink, ChannelSinkMetrics};
pub use event::StatusEvent;
pub use sink::{BufferedStatusSink, LoggingStatusSink, NoOpStatusSink, StatusSink, TeeStatusSink};
