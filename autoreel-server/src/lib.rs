//! HTTP transport for the autoreel pipeline.
//!
//! Exposes `GET /health` and `POST /api/pipeline`. The pipeline endpoint
//! validates the brief, runs it with a fresh in-memory status sink and
//! always answers with a [`PipelineEnvelope`] carrying the collected
//! status updates.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod envelope;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use envelope::PipelineEnvelope;
pub use error::{ApiError, ApiResult};
pub use router::build_app_router;
pub use state::AppState;
