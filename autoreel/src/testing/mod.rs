//! Testing utilities for autoreel pipelines.
//!
//! This module provides:
//! - Fixture briefs, scripts and prompts
//! - Stub, failing and counting adapters
//! - Misbehaving status sinks
//! - Timeline assertions

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_full_timeline, assert_timeline, labels_until};
pub use fixtures::{sample_brief, sample_prompts, sample_request, sample_script};
pub use mocks::{
    stub_adapters, CallLog, CountingAdapters, FailingSink, FailingStage, SlowSink, StubPromptDesigner,
    StubPublisher, StubRenderer, StubScriptwriter,
};
