//! HTTP adapters that call remote stage services.
//!
//! Every stage service speaks the same small protocol: `POST` a camelCase
//! JSON body to the configured URL and receive the stage output as JSON.
//! Transport and status failures are mapped onto [`AdapterError`] so the
//! retry wrapper can tell transient problems from rejections.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{PromptDesigner, Publisher, Renderer, Scriptwriter};
use crate::config::BackendConfig;
use crate::core::{Brief, PublishOutput, RenderOutput, Script, VisualPrompt};
use crate::errors::{AdapterError, ConfigError};

const BODY_EXCERPT_CHARS: usize = 200;

/// Shared JSON-over-HTTP client for one stage endpoint.
#[derive(Debug, Clone)]
pub struct HttpStageClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpStageClient {
    /// Builds a client for `url` using the backend's timeout and API key.
    pub fn new(url: impl Into<String>, config: &BackendConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| {
                ConfigError::invalid(
                    "AUTOREEL_REQUEST_TIMEOUT_SECS",
                    config.request_timeout_secs.to_string(),
                    e.to_string(),
                )
            })?;

        Ok(Self::with_client(client, url, config.api_key.clone()))
    }

    /// Reuses an existing [`reqwest::Client`].
    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            api_key,
        }
    }

    /// The endpoint this client posts to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Posts `body` and decodes the response as `O`.
    pub async fn post<I, O>(&self, body: &I) -> Result<O, AdapterError>
    where
        I: Serialize + Sync + ?Sized,
        O: DeserializeOwned,
    {
        let mut request = self.client.post(&self.url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(map_request_error)?;
        let response = ensure_success(response).await?;
        debug!(url = %self.url, status = %response.status(), "Stage service responded");

        response.json::<O>().await.map_err(|e| {
            if e.is_decode() {
                AdapterError::invalid_response(e.to_string())
            } else {
                map_request_error(e)
            }
        })
    }
}

fn map_request_error(err: reqwest::Error) -> AdapterError {
    if err.is_timeout() {
        AdapterError::timeout(err.to_string())
    } else if err.is_decode() {
        AdapterError::invalid_response(err.to_string())
    } else {
        AdapterError::transport(err.to_string())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, AdapterError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(map_status(status.as_u16(), &body))
}

/// Maps a non-2xx status and body onto an adapter error.
fn map_status(status: u16, body: &str) -> AdapterError {
    let excerpt: String = body.trim().chars().take(BODY_EXCERPT_CHARS).collect();
    match status {
        401 | 403 => AdapterError::rejected("unauthorized"),
        408 | 504 => AdapterError::timeout(format!("HTTP {status}: {excerpt}")),
        429 => AdapterError::quota_exceeded(excerpt),
        502 | 503 => AdapterError::transport(format!("HTTP {status}: {excerpt}")),
        _ => AdapterError::rejected(format!("HTTP {status}: {excerpt}")),
    }
}

#[derive(Serialize)]
struct ScriptRequest<'a> {
    brief: &'a Brief,
}

#[derive(Serialize)]
struct PromptRequest<'a> {
    script: &'a Script,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptResponse {
    visual_prompts: Vec<VisualPrompt>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderRequest<'a> {
    visual_prompts: &'a [VisualPrompt],
    script: &'a Script,
}

#[derive(Serialize)]
struct PublishRequest<'a> {
    render: &'a RenderOutput,
    brief: &'a Brief,
}

/// Scriptwriter backed by a remote service.
#[derive(Debug, Clone)]
pub struct HttpScriptwriter {
    client: HttpStageClient,
}

impl HttpScriptwriter {
    /// Wraps a stage client.
    #[must_use]
    pub fn new(client: HttpStageClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Scriptwriter for HttpScriptwriter {
    async fn write_script(&self, brief: &Brief) -> Result<Script, AdapterError> {
        self.client.post(&ScriptRequest { brief }).await
    }
}

/// Prompt designer backed by a remote service.
#[derive(Debug, Clone)]
pub struct HttpPromptDesigner {
    client: HttpStageClient,
}

impl HttpPromptDesigner {
    /// Wraps a stage client.
    #[must_use]
    pub fn new(client: HttpStageClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PromptDesigner for HttpPromptDesigner {
    async fn design_prompts(&self, script: &Script) -> Result<Vec<VisualPrompt>, AdapterError> {
        let response: PromptResponse = self.client.post(&PromptRequest { script }).await?;
        Ok(response.visual_prompts)
    }
}

/// Renderer backed by a remote service.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: HttpStageClient,
}

impl HttpRenderer {
    /// Wraps a stage client.
    #[must_use]
    pub fn new(client: HttpStageClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(
        &self,
        prompts: &[VisualPrompt],
        script: &Script,
    ) -> Result<RenderOutput, AdapterError> {
        self.client
            .post(&RenderRequest {
                visual_prompts: prompts,
                script,
            })
            .await
    }
}

/// Publisher backed by a remote service.
#[derive(Debug, Clone)]
pub struct HttpPublisher {
    client: HttpStageClient,
}

impl HttpPublisher {
    /// Wraps a stage client.
    #[must_use]
    pub fn new(client: HttpStageClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Publisher for HttpPublisher {
    async fn publish(
        &self,
        render: &RenderOutput,
        brief: &Brief,
    ) -> Result<PublishOutput, AdapterError> {
        self.client.post(&PublishRequest { render, brief }).await
    }
}
