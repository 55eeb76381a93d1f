//! Retry utilities with configurable backoff and jitter strategies.
//!
//! Retries happen inside a single stage invocation: the orchestrator sees
//! one call and one outcome, so the status timeline still carries exactly
//! one `started`/`completed` pair per stage.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use super::{Publisher, PromptDesigner, Renderer, Scriptwriter};
use crate::core::{Brief, PublishOutput, RenderOutput, Script, VisualPrompt};
use crate::errors::AdapterError;

/// Backoff strategy for retry delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    /// delay = base * 2^attempt
    #[default]
    Exponential,
    /// delay = base * (attempt + 1)
    Linear,
    /// delay = base
    Constant,
}

/// Jitter strategy applied on top of the backoff delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JitterStrategy {
    /// No jitter
    None,
    /// Random from 0 to delay
    #[default]
    Full,
    /// Half fixed, half random
    Equal,
    /// min(max, random(base, prev * 3))
    Decorrelated,
}

/// Configuration for adapter retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts, including the first one. `1` disables retrying.
    pub max_attempts: usize,
    /// Base delay between attempts in milliseconds.
    pub base_delay_ms: u64,
    /// Delay cap in milliseconds.
    pub max_delay_ms: u64,
    /// Backoff strategy.
    pub backoff_strategy: BackoffStrategy,
    /// Jitter strategy.
    pub jitter_strategy: JitterStrategy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
            backoff_strategy: BackoffStrategy::Exponential,
            jitter_strategy: JitterStrategy::Full,
        }
    }
}

impl RetryConfig {
    /// Creates a new retry config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A config that makes exactly one attempt.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default().with_max_attempts(1)
    }

    /// Sets the maximum attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Sets the base delay.
    #[must_use]
    pub fn with_base_delay_ms(mut self, delay: u64) -> Self {
        self.base_delay_ms = delay;
        self
    }

    /// Sets the maximum delay.
    #[must_use]
    pub fn with_max_delay_ms(mut self, delay: u64) -> Self {
        self.max_delay_ms = delay;
        self
    }

    /// Sets the backoff strategy.
    #[must_use]
    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff_strategy = strategy;
        self
    }

    /// Sets the jitter strategy.
    #[must_use]
    pub fn with_jitter(mut self, strategy: JitterStrategy) -> Self {
        self.jitter_strategy = strategy;
        self
    }
}

/// Per-call retry bookkeeping.
#[derive(Debug, Default)]
pub struct RetryState {
    /// Failed attempts so far.
    pub attempt: usize,
    previous_delay_ms: Option<u64>,
}

impl RetryState {
    /// Creates a new retry state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once `max_attempts` attempts have failed.
    #[must_use]
    pub fn is_exhausted(&self, config: &RetryConfig) -> bool {
        self.attempt + 1 >= config.max_attempts
    }

    /// Calculates the delay before the next attempt.
    #[must_use]
    pub fn calculate_delay(&mut self, config: &RetryConfig) -> Duration {
        let base = config.base_delay_ms;
        let max = config.max_delay_ms;
        let attempt = u32::try_from(self.attempt).unwrap_or(u32::MAX);

        let delay = match config.backoff_strategy {
            BackoffStrategy::Exponential => base.saturating_mul(2u64.saturating_pow(attempt)),
            BackoffStrategy::Linear => base.saturating_mul(u64::from(attempt) + 1),
            BackoffStrategy::Constant => base,
        }
        .min(max);

        let jittered = match config.jitter_strategy {
            JitterStrategy::None => delay,
            JitterStrategy::Full => {
                if delay == 0 {
                    0
                } else {
                    rand::thread_rng().gen_range(0..=delay)
                }
            }
            JitterStrategy::Equal => {
                let half = delay / 2;
                if half == 0 {
                    delay
                } else {
                    half + rand::thread_rng().gen_range(0..=half)
                }
            }
            JitterStrategy::Decorrelated => {
                let prev = self.previous_delay_ms.unwrap_or(base);
                let upper = prev.saturating_mul(3).min(max);
                if upper <= base {
                    base
                } else {
                    rand::thread_rng().gen_range(base..=upper)
                }
            }
        };

        self.previous_delay_ms = Some(jittered);
        Duration::from_millis(jittered)
    }
}

/// Outcome of a retry decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the specified delay.
    Retry(Duration),
    /// Attempts exhausted.
    GiveUp,
    /// The error is not worth retrying.
    NotRetryable,
}

/// Decides what to do after a failed attempt.
#[must_use]
pub fn should_retry(state: &mut RetryState, config: &RetryConfig, retryable: bool) -> RetryDecision {
    if !retryable {
        return RetryDecision::NotRetryable;
    }
    if state.is_exhausted(config) {
        return RetryDecision::GiveUp;
    }

    let delay = state.calculate_delay(config);
    state.attempt += 1;
    RetryDecision::Retry(delay)
}

/// Runs `operation` until it succeeds, fails with an error `is_retryable`
/// rejects, or attempts run out. The last error is returned.
pub async fn with_retry<T, E, F, Fut, P>(
    config: &RetryConfig,
    label: &str,
    is_retryable: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut state = RetryState::new();

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => match should_retry(&mut state, config, is_retryable(&e)) {
                RetryDecision::Retry(delay) => {
                    tracing::debug!(
                        operation = label,
                        attempt = state.attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "Retrying after error"
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::GiveUp => {
                    tracing::warn!(
                        operation = label,
                        attempts = state.attempt + 1,
                        error = %e,
                        "Retries exhausted"
                    );
                    return Err(e);
                }
                RetryDecision::NotRetryable => return Err(e),
            },
        }
    }
}

/// Adapter wrapper that retries transient failures.
///
/// Only errors where [`AdapterError::is_retryable`] holds are retried;
/// rejections and contract problems surface on the first attempt.
#[derive(Debug, Clone)]
pub struct Retrying<A> {
    inner: A,
    config: RetryConfig,
}

impl<A> Retrying<A> {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: A, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// The retry configuration in use.
    #[must_use]
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

#[async_trait]
impl<A: Scriptwriter> Scriptwriter for Retrying<A> {
    async fn write_script(&self, brief: &Brief) -> Result<Script, AdapterError> {
        let inner = &self.inner;
        with_retry(&self.config, "write_script", AdapterError::is_retryable, move || {
            inner.write_script(brief)
        })
        .await
    }
}

#[async_trait]
impl<A: PromptDesigner> PromptDesigner for Retrying<A> {
    async fn design_prompts(&self, script: &Script) -> Result<Vec<VisualPrompt>, AdapterError> {
        let inner = &self.inner;
        with_retry(&self.config, "design_prompts", AdapterError::is_retryable, move || {
            inner.design_prompts(script)
        })
        .await
    }
}

#[async_trait]
impl<A: Renderer> Renderer for Retrying<A> {
    async fn render(
        &self,
        prompts: &[VisualPrompt],
        script: &Script,
    ) -> Result<RenderOutput, AdapterError> {
        let inner = &self.inner;
        with_retry(&self.config, "render", AdapterError::is_retryable, move || {
            inner.render(prompts, script)
        })
        .await
    }
}

#[async_trait]
impl<A: Publisher> Publisher for Retrying<A> {
    async fn publish(
        &self,
        render: &RenderOutput,
        brief: &Brief,
    ) -> Result<PublishOutput, AdapterError> {
        let inner = &self.inner;
        with_retry(&self.config, "publish", AdapterError::is_retryable, move || {
            inner.publish(render, brief)
        })
        .await
    }
}
