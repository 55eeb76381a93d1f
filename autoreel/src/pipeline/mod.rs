//! Pipeline orchestration.
//!
//! This module provides:
//! - The sequential [`Pipeline`] orchestrator
//! - Output checks applied between stages

mod contracts;
mod orchestrator;

pub use orchestrator::Pipeline;
