//! HTTP server configuration.

use std::time::Duration;

use autoreel::config::parse_or;
use autoreel::errors::ConfigError;

const TRANSPORT_GRACE_SECS: u64 = 5;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// Deadline for one pipeline run in seconds (default: `300`). Runs are
    /// long, so this is generous. The transport-level timeout sits a few
    /// seconds above it.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            cors_origins: vec!["http://localhost:5173".into()],
            request_timeout_secs: 300,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `300`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST")
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or(defaults.host);

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.cors_origins,
        };

        Ok(Self {
            host,
            port: parse_or("PORT", lookup("PORT"), defaults.port)?,
            cors_origins,
            request_timeout_secs: parse_or(
                "REQUEST_TIMEOUT_SECS",
                lookup("REQUEST_TIMEOUT_SECS"),
                defaults.request_timeout_secs,
            )?,
        })
    }

    /// Deadline the pipeline handler enforces on a run.
    #[must_use]
    pub const fn run_deadline(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Outer request timeout. Strictly above [`Self::run_deadline`] so the
    /// handler answers with its envelope first.
    #[must_use]
    pub const fn transport_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.saturating_add(TRANSPORT_GRACE_SECS))
    }

    /// `host:port`, for binding.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
