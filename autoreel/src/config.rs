//! Runtime configuration for pipelines and stage backends.
//!
//! Every struct can be built three ways: `Default`, serde (missing fields
//! fall back to defaults), or `from_env()`. Environment loading never
//! panics; a malformed value becomes a [`ConfigError`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::errors::ConfigError;
use crate::stages::{RetryConfig, StageAdapters};

fn default_sink_timeout_ms() -> u64 {
    2000
}

fn default_request_timeout_secs() -> u64 {
    120
}

/// Parses `raw` as `T`, falling back to `default` when the value is absent.
pub fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(key, value.clone(), e.to_string())),
    }
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Orchestrator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upper bound on a single status emission before it is abandoned.
    #[serde(default = "default_sink_timeout_ms")]
    pub sink_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sink_timeout_ms: default_sink_timeout_ms(),
        }
    }
}

impl PipelineConfig {
    /// Sets the per-emission sink timeout.
    #[must_use]
    pub fn with_sink_timeout_ms(mut self, ms: u64) -> Self {
        self.sink_timeout_ms = ms;
        self
    }

    /// The sink timeout as a [`Duration`].
    #[must_use]
    pub fn sink_timeout(&self) -> Duration {
        Duration::from_millis(self.sink_timeout_ms)
    }

    /// Loads settings from the process environment.
    ///
    /// | Env Var                    | Default |
    /// |----------------------------|---------|
    /// | `AUTOREEL_SINK_TIMEOUT_MS` | `2000`  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Loads settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            sink_timeout_ms: parse_or(
                "AUTOREEL_SINK_TIMEOUT_MS",
                lookup("AUTOREEL_SINK_TIMEOUT_MS"),
                default_sink_timeout_ms(),
            )?,
        })
    }
}

/// Which adapter family backs the stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    /// Deterministic local adapters.
    #[default]
    Offline,
    /// Remote stage services over HTTP.
    Http,
}

impl FromStr for BackendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offline" => Ok(Self::Offline),
            "http" => Ok(Self::Http),
            other => Err(format!("expected 'offline' or 'http', got '{other}'")),
        }
    }
}

/// Resolved stage endpoints for [`BackendMode::Http`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEndpoints {
    /// Script stage URL.
    pub scriptwriter: String,
    /// Prompt stage URL.
    pub prompt_designer: String,
    /// Render stage URL.
    pub renderer: String,
    /// Publish stage URL.
    pub publisher: String,
}

/// Stage backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Adapter family.
    #[serde(default)]
    pub mode: BackendMode,
    /// Script service URL.
    #[serde(default)]
    pub scriptwriter_url: Option<String>,
    /// Prompt service URL.
    #[serde(default)]
    pub prompt_designer_url: Option<String>,
    /// Render service URL.
    #[serde(default)]
    pub renderer_url: Option<String>,
    /// Publish service URL.
    #[serde(default)]
    pub publisher_url: Option<String>,
    /// Bearer token sent to every stage service.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Per-request timeout for stage services.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Adapter retry policy.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            mode: BackendMode::Offline,
            scriptwriter_url: None,
            prompt_designer_url: None,
            renderer_url: None,
            publisher_url: None,
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
            retry: RetryConfig::default(),
        }
    }
}

impl BackendConfig {
    /// Sets the adapter family.
    #[must_use]
    pub fn with_mode(mut self, mode: BackendMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets all four service URLs.
    #[must_use]
    pub fn with_endpoints(
        mut self,
        scriptwriter: impl Into<String>,
        prompt_designer: impl Into<String>,
        renderer: impl Into<String>,
        publisher: impl Into<String>,
    ) -> Self {
        self.scriptwriter_url = Some(scriptwriter.into());
        self.prompt_designer_url = Some(prompt_designer.into());
        self.renderer_url = Some(renderer.into());
        self.publisher_url = Some(publisher.into());
        self
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the four service URLs, or the first one that is missing.
    pub fn endpoints(&self) -> Result<BackendEndpoints, ConfigError> {
        fn require(value: &Option<String>, key: &str) -> Result<String, ConfigError> {
            value.clone().ok_or_else(|| ConfigError::Missing(key.to_string()))
        }

        Ok(BackendEndpoints {
            scriptwriter: require(&self.scriptwriter_url, "AUTOREEL_SCRIPTWRITER_URL")?,
            prompt_designer: require(&self.prompt_designer_url, "AUTOREEL_PROMPT_DESIGNER_URL")?,
            renderer: require(&self.renderer_url, "AUTOREEL_RENDERER_URL")?,
            publisher: require(&self.publisher_url, "AUTOREEL_PUBLISHER_URL")?,
        })
    }

    /// Loads settings from the process environment.
    ///
    /// | Env Var                         | Default   |
    /// |---------------------------------|-----------|
    /// | `AUTOREEL_BACKEND`              | `offline` |
    /// | `AUTOREEL_SCRIPTWRITER_URL`     | unset     |
    /// | `AUTOREEL_PROMPT_DESIGNER_URL`  | unset     |
    /// | `AUTOREEL_RENDERER_URL`         | unset     |
    /// | `AUTOREEL_PUBLISHER_URL`        | unset     |
    /// | `AUTOREEL_API_KEY`              | unset     |
    /// | `AUTOREEL_REQUEST_TIMEOUT_SECS` | `120`     |
    /// | `AUTOREEL_RETRY_ATTEMPTS`       | `3`       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Loads settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let attempts = parse_or(
            "AUTOREEL_RETRY_ATTEMPTS",
            lookup("AUTOREEL_RETRY_ATTEMPTS"),
            defaults.retry.max_attempts,
        )?;

        Ok(Self {
            mode: parse_or("AUTOREEL_BACKEND", lookup("AUTOREEL_BACKEND"), defaults.mode)?,
            scriptwriter_url: non_blank(lookup("AUTOREEL_SCRIPTWRITER_URL")),
            prompt_designer_url: non_blank(lookup("AUTOREEL_PROMPT_DESIGNER_URL")),
            renderer_url: non_blank(lookup("AUTOREEL_RENDERER_URL")),
            publisher_url: non_blank(lookup("AUTOREEL_PUBLISHER_URL")),
            api_key: non_blank(lookup("AUTOREEL_API_KEY")),
            request_timeout_secs: parse_or(
                "AUTOREEL_REQUEST_TIMEOUT_SECS",
                lookup("AUTOREEL_REQUEST_TIMEOUT_SECS"),
                defaults.request_timeout_secs,
            )?,
            retry: defaults.retry.with_max_attempts(attempts),
        })
    }
}

/// Builds the stage adapters described by `config`.
pub fn build_adapters(config: &BackendConfig) -> Result<StageAdapters, ConfigError> {
    StageAdapters::from_config(config)
}
