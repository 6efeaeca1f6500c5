//! Exponential backoff retry policy.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::ExplorerError;

/// Configuration for the retry policy.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the first try).
    pub max_retries: u32,
    /// Initial backoff delay.
    pub initial_backoff: Duration,
    /// Maximum backoff delay (caps exponential growth).
    pub max_backoff: Duration,
    /// Multiplier applied to backoff on each retry.
    pub multiplier: f64,
    /// Adds `jitter_fraction * backoff / 2` to each delay (0.0 = none).
    pub jitter_fraction: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
            jitter_fraction: 0.0,
        }
    }
}

impl RetryConfig {
    /// No retries at all; used by tests and one-shot lookups.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }
}

/// Stateless retry policy: computes the next delay from the attempt number.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    pub config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Delay before the `attempt`-th retry (1-based), or `None` once
    /// `max_retries` is exhausted.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.config.max_retries {
            return None;
        }
        let base_ms = self.config.initial_backoff.as_millis() as f64
            * self.config.multiplier.powi((attempt - 1) as i32);
        let cap_ms = self.config.max_backoff.as_millis() as f64;
        let capped = base_ms.min(cap_ms);
        let jitter_ms = capped * self.config.jitter_fraction * 0.5;
        Some(Duration::from_millis((capped + jitter_ms) as u64))
    }

    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt <= self.config.max_retries
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy runs out of attempts.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    address: &str,
    mut op: F,
) -> Result<T, ExplorerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ExplorerError>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if e.is_retryable() => {
                attempt += 1;
                let Some(delay) = policy.next_delay(attempt) else {
                    return Err(e);
                };
                warn!(
                    address,
                    call = label,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "retrying explorer call"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
