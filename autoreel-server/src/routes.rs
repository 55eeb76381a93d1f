//! Route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use autoreel::core::{Brief, BriefRequest};
use autoreel::events::BufferedStatusSink;

use crate::envelope::PipelineEnvelope;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
}

/// GET /health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /api/pipeline -- validates a brief and runs it to completion.
async fn run_pipeline(
    State(state): State<AppState>,
    body: Result<Json<BriefRequest>, JsonRejection>,
) -> ApiResult<Json<PipelineEnvelope>> {
    let Json(request) = body.map_err(|rejection| ApiError::MalformedRequest {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;

    let brief = Brief::from_request(request)?;
    let sink = BufferedStatusSink::new();

    // The sink outlives the timed future so an elapsed run still reports its events.
    let outcome = tokio::time::timeout(state.run_deadline, state.pipeline.run(&brief, &sink)).await;
    match outcome {
        Ok(Ok(result)) => Ok(Json(PipelineEnvelope::success(result, sink.into_events()))),
        Ok(Err(failure)) => Err(ApiError::stage(failure, sink.into_events())),
        Err(_) => Err(ApiError::run_timeout(
            state.run_deadline.as_secs(),
            sink.into_events(),
        )),
    }
}

/// Mount health check routes.
pub fn health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Mount pipeline routes (intended for nesting under `/api`).
pub fn pipeline_router() -> Router<AppState> {
    Router::new().route("/pipeline", post(run_pipeline))
}
