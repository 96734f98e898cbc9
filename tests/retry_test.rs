use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use scamguard::providers::retry::{RetryConfig, RetryingProvider};
use scamguard::{
    AnalysisProvider, ClassificationInput, ClassificationResult, Result, ScamGuardError, classify,
};

/// Mock provider that fails N times then succeeds.
struct FailThenSucceed {
    fail_count: AtomicU32,
    fail_with: fn() -> ScamGuardError,
    total_calls: AtomicU32,
}

impl FailThenSucceed {
    fn new(failures: u32, fail_with: fn() -> ScamGuardError) -> Self {
        Self {
            fail_count: AtomicU32::new(failures),
            fail_with,
            total_calls: AtomicU32::new(0),
        }
    }

    fn call_count(&self) -> u32 {
        self.total_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AnalysisProvider for FailThenSucceed {
    fn name(&self) -> &str {
        "mock-retry"
    }

    async fn analyze(&self, input: &ClassificationInput) -> Result<ClassificationResult> {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
        let remaining = self.fail_count.load(Ordering::Relaxed);
        if remaining > 0 {
            self.fail_count.fetch_sub(1, Ordering::Relaxed);
            return Err((self.fail_with)());
        }
        Ok(classify(input))
    }
}

fn fast_config(max_attempts: u32) -> RetryConfig {
    RetryConfig::new()
        .max_attempts(max_attempts)
        .initial_delay(Duration::from_millis(1))
        .jitter(false)
}

fn input() -> ClassificationInput {
    ClassificationInput::text("hello")
}

#[tokio::test]
async fn retries_on_transient_error_then_succeeds() {
    let inner = Arc::new(FailThenSucceed::new(2, || ScamGuardError::RateLimited {
        retry_after: None,
    }));
    let provider = RetryingProvider::new(inner.clone(), fast_config(3));

    let result = provider.analyze(&input()).await;

    assert!(result.is_ok());
    assert_eq!(inner.call_count(), 3);
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let inner = Arc::new(FailThenSucceed::new(10, || ScamGuardError::Api {
        status: 503,
        message: "unavailable".into(),
    }));
    let provider = RetryingProvider::new(inner.clone(), fast_config(3));

    let err = provider.analyze(&input()).await.unwrap_err();

    assert!(matches!(err, ScamGuardError::Api { status: 503, .. }));
    assert_eq!(inner.call_count(), 3);
}

#[tokio::test]
async fn permanent_errors_are_not_retried() {
    let permanent: [fn() -> ScamGuardError; 4] = [
        || ScamGuardError::AuthenticationFailed,
        || ScamGuardError::Decode("unknown similarity".into()),
        || ScamGuardError::Api {
            status: 400,
            message: "bad request".into(),
        },
        || ScamGuardError::ContentFiltered {
            reason: "SAFETY".into(),
        },
    ];

    for fail_with in permanent {
        let inner = Arc::new(FailThenSucceed::new(1, fail_with));
        let provider = RetryingProvider::new(inner.clone(), fast_config(5));

        assert!(provider.analyze(&input()).await.is_err());
        assert_eq!(inner.call_count(), 1);
    }
}

#[tokio::test]
async fn disabled_config_makes_a_single_attempt() {
    let inner = Arc::new(FailThenSucceed::new(1, || ScamGuardError::EmptyResponse));
    let provider = RetryingProvider::new(inner.clone(), RetryConfig::disabled());

    assert!(provider.analyze(&input()).await.is_err());
    assert_eq!(inner.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn honours_retry_after_hint() {
    let inner = Arc::new(FailThenSucceed::new(1, || ScamGuardError::RateLimited {
        retry_after: Some(Duration::from_secs(5)),
    }));
    let provider = RetryingProvider::new(inner.clone(), fast_config(2));

    let start = tokio::time::Instant::now();
    provider.analyze(&input()).await.unwrap();

    assert!(start.elapsed() >= Duration::from_secs(5));
    assert_eq!(inner.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn long_retry_after_hint_is_capped_at_max_delay() {
    let inner = Arc::new(FailThenSucceed::new(1, || ScamGuardError::RateLimited {
        retry_after: Some(Duration::from_secs(86_400)),
    }));
    let max_delay = Duration::from_secs(30);
    let provider = RetryingProvider::new(inner.clone(), fast_config(2).max_delay(max_delay));

    let start = tokio::time::Instant::now();
    provider.analyze(&input()).await.unwrap();

    assert!(start.elapsed() <= max_delay, "{:?}", start.elapsed());
    assert_eq!(inner.call_count(), 2);
}

#[tokio::test]
async fn wrapper_keeps_inner_name() {
    let inner = Arc::new(FailThenSucceed::new(0, || ScamGuardError::EmptyResponse));
    let provider = RetryingProvider::new(inner, RetryConfig::new());
    assert_eq!(provider.name(), "mock-retry");
}

#[test]
fn default_config_values() {
    let config = RetryConfig::default();
    assert_eq!(config.max_attempts, 3);
    assert_eq!(config.initial_delay, Duration::from_millis(500));
    assert_eq!(config.max_delay, Duration::from_secs(30));
    assert!(config.jitter);
}
