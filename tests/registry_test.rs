//! Fallback chain semantics of `ProviderRegistry`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use scamguard::providers::registry::FALLBACK_PROVIDER;
use scamguard::{
    AnalysisProvider, AnalysisSource, ClassificationInput, ClassificationResult, ProviderRegistry,
    Result, RetryConfig, RiskLevel, ScamGuardError, Similarity, classify,
};

// ============================================================================
// Mock providers
// ============================================================================

fn canned_result() -> ClassificationResult {
    ClassificationResult {
        risk_level: RiskLevel::Suspicious,
        score: 70,
        scam_type: "Investment Scam".to_string(),
        risk_indicators: vec!["Upfront Payment Request".to_string()],
        similarity: Similarity::Medium,
        reasons: vec!["model reason".to_string()],
        advice: "model advice".to_string(),
        simplified_explanation: "model explanation".to_string(),
    }
}

struct Canned {
    name: &'static str,
    calls: AtomicU32,
}

impl Canned {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl AnalysisProvider for Canned {
    fn name(&self) -> &str {
        self.name
    }

    async fn analyze(&self, _input: &ClassificationInput) -> Result<ClassificationResult> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(canned_result())
    }
}

struct Failing {
    error: fn() -> ScamGuardError,
    calls: AtomicU32,
}

impl Failing {
    fn new(error: fn() -> ScamGuardError) -> Self {
        Self {
            error,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl AnalysisProvider for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    async fn analyze(&self, _input: &ClassificationInput) -> Result<ClassificationResult> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Err((self.error)())
    }
}

fn input() -> ClassificationInput {
    ClassificationInput::text("URGENT: send your OTP")
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn upstream_verdict_passes_through_unchanged() {
    let mut registry = ProviderRegistry::new();
    registry.add(Arc::new(Canned::new("canned")));

    let analysis = registry.analyze(&input()).await;

    assert_eq!(analysis.source, AnalysisSource::Upstream);
    assert_eq!(analysis.provider, "canned");
    assert_eq!(analysis.result, canned_result());
}

#[tokio::test]
async fn no_provider_falls_back_to_rules() {
    let registry = ProviderRegistry::new();
    let analysis = registry.analyze(&input()).await;

    assert!(analysis.is_fallback());
    assert_eq!(analysis.provider, FALLBACK_PROVIDER);
    assert_eq!(analysis.result, classify(&input()));
}

#[tokio::test]
async fn every_upstream_error_falls_back() {
    let errors: [fn() -> ScamGuardError; 6] = [
        || ScamGuardError::AuthenticationFailed,
        || ScamGuardError::RateLimited { retry_after: None },
        || ScamGuardError::Api {
            status: 500,
            message: "boom".into(),
        },
        || ScamGuardError::Decode("bad enum".into()),
        || ScamGuardError::Http("connection refused".into()),
        || ScamGuardError::EmptyResponse,
    ];

    for error in errors {
        let mut registry = ProviderRegistry::new();
        registry.add(Arc::new(Failing::new(error)));

        let analysis = registry.analyze(&input()).await;
        assert_eq!(analysis.source, AnalysisSource::Fallback);
        assert_eq!(analysis.result, classify(&input()));
    }
}

#[tokio::test]
async fn first_success_wins() {
    let first = Arc::new(Canned::new("first"));
    let second = Arc::new(Canned::new("second"));
    let mut registry = ProviderRegistry::new();
    registry.add(first.clone());
    registry.add(second.clone());

    let analysis = registry.analyze(&input()).await;

    assert_eq!(analysis.provider, "first");
    assert_eq!(first.calls.load(Ordering::Relaxed), 1);
    assert_eq!(second.calls.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn failing_provider_moves_to_next() {
    let failing = Arc::new(Failing::new(|| ScamGuardError::AuthenticationFailed));
    let mut registry = ProviderRegistry::new();
    registry.add(failing.clone());
    registry.add(Arc::new(Canned::new("backup")));

    let analysis = registry.analyze(&input()).await;

    assert_eq!(analysis.source, AnalysisSource::Upstream);
    assert_eq!(analysis.provider, "backup");
    assert_eq!(failing.calls.load(Ordering::Relaxed), 1);
}

#[tokio::test(start_paused = true)]
async fn registered_providers_are_retried() {
    let failing = Arc::new(Failing::new(|| ScamGuardError::RateLimited {
        retry_after: None,
    }));
    let mut registry = ProviderRegistry::new();
    registry.set_retry_config(RetryConfig::new().max_attempts(3).jitter(false));
    registry.add(failing.clone());

    let analysis = registry.analyze(&input()).await;

    assert!(analysis.is_fallback());
    assert_eq!(failing.calls.load(Ordering::Relaxed), 3);
}

#[tokio::test]
async fn providers_added_before_retry_config_are_not_wrapped() {
    let failing = Arc::new(Failing::new(|| ScamGuardError::EmptyResponse));
    let mut registry = ProviderRegistry::new();
    registry.add(failing.clone());
    registry.set_retry_config(RetryConfig::new().max_attempts(5));

    registry.analyze(&input()).await;

    assert_eq!(failing.calls.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn analysis_serializes_flat_with_provenance() {
    let registry = ProviderRegistry::new();
    let analysis = registry.analyze(&input()).await;

    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["riskLevel"], "high-risk");
    assert_eq!(json["source"], "fallback");
    assert_eq!(json["provider"], "rules");
    assert!(json["analyzedAt"].as_u64().unwrap() > 0);
}
