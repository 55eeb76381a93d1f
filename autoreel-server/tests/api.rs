//! Integration tests for the HTTP endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use async_trait::async_trait;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use autoreel::config::PipelineConfig;
use autoreel::core::{RenderOutput, Script, StageName, VisualPrompt};
use autoreel::errors::AdapterError;
use autoreel::pipeline::Pipeline;
use autoreel::stages::{Renderer, StageAdapters};
use autoreel::testing::{labels_until, stub_adapters, FailingStage};
use autoreel_server::{build_app_router, AppState, ServerConfig};

fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

fn app_with(adapters: StageAdapters) -> Router {
    app_with_config(adapters, &test_config())
}

fn app_with_config(adapters: StageAdapters, config: &ServerConfig) -> Router {
    let state = AppState::new(Pipeline::new(adapters, PipelineConfig::default()));
    build_app_router(state, config)
}

/// Renderer that never answers within a test's lifetime.
struct HangingRenderer;

#[async_trait]
impl Renderer for HangingRenderer {
    async fn render(
        &self,
        _prompts: &[VisualPrompt],
        _script: &Script,
    ) -> Result<RenderOutput, AdapterError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(AdapterError::timeout("unreachable"))
    }
}

fn offline_app() -> Router {
    app_with(StageAdapters::offline())
}

fn sample_body() -> Value {
    json!({
        "topic": "AI automation for video creators",
        "targetAudience": "Busy YouTubers",
        "contentGoals": "Educate on automation",
        "durationSeconds": 120
    })
}

async fn post_json(app: Router, uri: &str, body: &Value) -> axum::response::Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn labels(json: &Value) -> Vec<String> {
    json["statusUpdates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| format!("{}:{}", e["stage"].as_str().unwrap(), e["phase"].as_str().unwrap()))
        .collect()
}

#[tokio::test]
async fn health_returns_healthy() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = offline_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn successful_run_returns_result_and_eight_updates() {
    let response = post_json(offline_app(), "/api/pipeline", &sample_body()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ok"], true);
    assert_eq!(labels(&json), labels_until(None));

    let result = &json["result"];
    assert_eq!(
        result["visualPrompts"].as_array().unwrap().len(),
        result["script"]["sections"].as_array().unwrap().len()
    );
    assert!(!result["metadata"]["tags"].as_array().unwrap().is_empty());
    assert!(result["youtubeVideoUrl"].is_string());
    assert!(result["videoDownloadUrl"].is_string());
}

#[tokio::test]
async fn invalid_brief_is_rejected_before_any_stage() {
    let mut body = sample_body();
    body["durationSeconds"] = json!(29);
    body["topic"] = json!("AI");

    let response = post_json(offline_app(), "/api/pipeline", &body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["errorKind"], "validation");
    assert!(json["statusUpdates"].as_array().unwrap().is_empty());

    let fields: Vec<&str> = json["fieldErrors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"durationSeconds"));
    assert!(fields.contains(&"topic"));
}

#[tokio::test]
async fn duration_bounds_are_inclusive() {
    for (seconds, expected) in [
        (29, StatusCode::UNPROCESSABLE_ENTITY),
        (30, StatusCode::OK),
        (300, StatusCode::OK),
        (301, StatusCode::UNPROCESSABLE_ENTITY),
    ] {
        let mut body = sample_body();
        body["durationSeconds"] = json!(seconds);
        let response = post_json(offline_app(), "/api/pipeline", &body).await;
        assert_eq!(response.status(), expected, "durationSeconds = {seconds}");
    }
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/pipeline")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"topic\": "))
        .unwrap();
    let response = offline_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["errorKind"], "malformed_request");
}

#[tokio::test]
async fn render_failure_returns_partial_timeline() {
    let adapters = StageAdapters {
        renderer: Arc::new(FailingStage::timeout()),
        ..stub_adapters()
    };

    let response = post_json(app_with(adapters), "/api/pipeline", &sample_body()).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["failedStage"], "render");
    assert_eq!(json["errorKind"], "timeout");
    assert!(json.get("result").is_none());
    assert_eq!(labels(&json), labels_until(Some(StageName::Render)));
}

#[tokio::test]
async fn publish_quota_failure_returns_seven_updates() {
    let adapters = StageAdapters {
        publisher: Arc::new(FailingStage::quota()),
        ..stub_adapters()
    };

    let response = post_json(app_with(adapters), "/api/pipeline", &sample_body()).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["failedStage"], "publish");
    assert_eq!(json["statusUpdates"].as_array().unwrap().len(), 7);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Publish stage failed"));
}

#[tokio::test]
async fn run_past_deadline_returns_envelope_with_partial_timeline() {
    let adapters = StageAdapters {
        renderer: Arc::new(HangingRenderer),
        ..stub_adapters()
    };
    let config = ServerConfig {
        request_timeout_secs: 1,
        ..test_config()
    };

    let response = post_json(app_with_config(adapters, &config), "/api/pipeline", &sample_body()).await;

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let json = body_json(response).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["errorKind"], "timeout");
    assert_eq!(json["failedStage"], "render");
    assert!(json.get("result").is_none());
    assert_eq!(labels(&json), labels_until(Some(StageName::Render)));
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let request = Request::builder().uri("/nope").body(Body::empty()).unwrap();
    let response = offline_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
