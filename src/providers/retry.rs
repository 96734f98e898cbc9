//! Retry configuration, delay calculation, and the retrying provider decorator.
//!
//! [`RetryingProvider`] wraps any [`AnalysisProvider`] and retries transient
//! errors with exponential backoff before the registry gives up on it and
//! moves to the next provider.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::warn;

use crate::telemetry;

use super::traits::AnalysisProvider;
use crate::types::{ClassificationInput, ClassificationResult};
use crate::{Result, ScamGuardError};

/// Relative spread applied to each delay when jitter is enabled (±20%).
const JITTER_FRACTION: f64 = 0.2;

/// Configuration for retry behaviour on transient errors.
///
/// ```rust
/// # use scamguard::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(200))
///     .jitter(true);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 3.
    pub max_attempts: u32,
    /// Base delay before the first retry. Default: 500ms.
    pub initial_delay: Duration,
    /// Maximum delay between retries (caps exponential growth and
    /// `retry_after` hints). Default: 30s.
    pub max_delay: Duration,
    /// Whether to add random jitter to delays. Default: true.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single attempt, no retry.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set the maximum number of attempts, including the first request.
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the base delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the upper bound on any single delay, server hints included.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Enable or disable random jitter on computed delays.
    pub fn jitter(mut self, enabled: bool) -> Self {
        self.jitter = enabled;
        self
    }

    /// Backoff for a given attempt number (0-indexed), without jitter.
    ///
    /// `initial_delay * 2^attempt`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.max_delay)
    }

    /// Delay before the next attempt.
    ///
    /// A server `retry_after` hint wins over the computed backoff and is
    /// never jittered. Either way the delay is capped at `max_delay`.
    pub fn effective_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        match retry_after {
            Some(hint) => hint.min(self.max_delay),
            None if self.jitter => jittered(self.delay_for_attempt(attempt), self.max_delay),
            None => self.delay_for_attempt(attempt),
        }
    }
}

fn jittered(delay: Duration, cap: Duration) -> Duration {
    let factor = 1.0 + rand::thread_rng().gen_range(-JITTER_FRACTION..=JITTER_FRACTION);
    delay.mul_f64(factor).min(cap)
}

/// Execute an async operation with retry logic.
///
/// Transient errors (see [`ScamGuardError::is_transient`]) are retried up to
/// `config.max_attempts`; permanent errors are returned immediately.
pub(crate) async fn with_retry<F, Fut, T>(config: &RetryConfig, provider_name: &str, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..config.max_attempts.max(1) {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() => {
                if attempt + 1 < config.max_attempts {
                    metrics::counter!(telemetry::RETRIES_TOTAL,
                        "provider" => provider_name.to_owned(),
                    )
                    .increment(1);
                    let delay = config.effective_delay(attempt, e.retry_after());
                    warn!(
                        provider = provider_name,
                        attempt = attempt + 1,
                        max_attempts = config.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or(ScamGuardError::NoProvider))
}

/// Decorator that wraps an [`AnalysisProvider`] with retry logic.
///
/// Respects `retry_after` hints from `RateLimited` errors. After the last
/// attempt the final transient error is returned so the registry can fall
/// back.
pub struct RetryingProvider {
    inner: Arc<dyn AnalysisProvider>,
    config: RetryConfig,
}

impl RetryingProvider {
    pub fn new(inner: Arc<dyn AnalysisProvider>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl AnalysisProvider for RetryingProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn analyze(&self, input: &ClassificationInput) -> Result<ClassificationResult> {
        with_retry(&self.config, self.inner.name(), || self.inner.analyze(input)).await
    }
}
