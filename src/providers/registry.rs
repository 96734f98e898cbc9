//! Provider registry with fallback chain semantics.
//!
//! The `ProviderRegistry` stores upstream providers in priority order
//! (index 0 = highest). An analysis tries them in order until one returns a
//! validated verdict. If every provider fails, or none is registered, the
//! rule classifier answers instead, so [`ProviderRegistry::analyze`] never
//! fails.
//!
//! # Retry Wrapping
//!
//! When a `RetryConfig` is set, providers are wrapped in [`RetryingProvider`]
//! at registration time. Each provider retries internally before the
//! registry sees its error and moves on.
//!
//! # Fallback Chain Flow
//!
//! ```text
//! detector.analyze(input)
//!            │
//!            ▼
//!   ┌─────────────────────┐
//!   │  GeminiClient       │ ──► validated verdict? return (source = upstream)
//!   │  (priority 0)       │ ──► any error: log, try next
//!   └─────────┬───────────┘
//!             │ chain exhausted
//!             ▼
//!   ┌─────────────────────┐
//!   │  RuleClassifier     │ ──► always answers (source = fallback)
//!   └─────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use crate::telemetry;

use super::retry::{RetryConfig, RetryingProvider};
use super::traits::AnalysisProvider;
use crate::classifier::RuleClassifier;
use crate::types::{Analysis, AnalysisSource, ClassificationInput};
use crate::{Result, ScamGuardError};

/// Name reported for verdicts produced by the rule classifier.
pub const FALLBACK_PROVIDER: &str = "rules";

/// Registry of upstream providers backed by the rule classifier.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn AnalysisProvider>>,
    fallback: RuleClassifier,
    retry_config: Option<RetryConfig>,
}

impl ProviderRegistry {
    /// Create an empty registry over the built-in catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with a specific fallback classifier.
    pub fn with_fallback(fallback: RuleClassifier) -> Self {
        Self {
            fallback,
            ..Self::default()
        }
    }

    /// Set the retry configuration.
    ///
    /// Providers registered after this call are wrapped in [`RetryingProvider`].
    pub fn set_retry_config(&mut self, config: RetryConfig) {
        self.retry_config = Some(config);
    }

    /// Add an upstream provider (appended to end = lowest priority).
    pub fn add(&mut self, provider: Arc<dyn AnalysisProvider>) {
        let provider = match &self.retry_config {
            Some(config) if config.max_attempts > 1 => {
                Arc::new(RetryingProvider::new(provider, config.clone())) as Arc<dyn AnalysisProvider>
            }
            _ => provider,
        };
        self.providers.push(provider);
    }

    /// Whether any upstream provider is registered.
    pub fn has_upstream(&self) -> bool {
        !self.providers.is_empty()
    }

    /// Upstream provider names in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn fallback(&self) -> &RuleClassifier {
        &self.fallback
    }

    /// Analyze with the upstream chain, falling back to the rule classifier.
    #[instrument(skip_all, fields(text_len = input.text.len(), attachments = input.attachments.len()))]
    pub async fn analyze(&self, input: &ClassificationInput) -> Analysis {
        let analysis = match self.analyze_upstream(input).await {
            Ok(analysis) => analysis,
            Err(e) => {
                let reason = match e {
                    ScamGuardError::NoProvider => "no_provider",
                    _ => "upstream_error",
                };
                metrics::counter!(telemetry::FALLBACKS_TOTAL, "reason" => reason).increment(1);
                debug!(reason, "using rule classifier");
                Analysis::new(
                    self.fallback.classify(input),
                    AnalysisSource::Fallback,
                    FALLBACK_PROVIDER,
                )
            }
        };

        metrics::counter!(telemetry::CLASSIFICATIONS_TOTAL,
            "risk_level" => analysis.result.risk_level.as_str(),
            "source" => analysis.source.as_str(),
        )
        .increment(1);
        analysis
    }

    /// Try the upstream chain only.
    ///
    /// Returns `NoProvider` when nothing is registered, otherwise the error
    /// of the last provider tried.
    pub async fn analyze_upstream(&self, input: &ClassificationInput) -> Result<Analysis> {
        let mut last_err = ScamGuardError::NoProvider;

        for provider in &self.providers {
            let name = provider.name().to_string();
            let start = Instant::now();
            let result = provider.analyze(input).await;
            metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "provider" => name.clone())
                .record(start.elapsed().as_secs_f64());

            match result {
                Ok(verdict) => {
                    metrics::counter!(telemetry::REQUESTS_TOTAL,
                        "provider" => name.clone(),
                        "status" => "ok",
                    )
                    .increment(1);
                    return Ok(Analysis::new(verdict, AnalysisSource::Upstream, &name));
                }
                Err(e) => {
                    metrics::counter!(telemetry::REQUESTS_TOTAL,
                        "provider" => name.clone(),
                        "status" => "error",
                    )
                    .increment(1);
                    warn!(provider = %name, error = %e, "upstream analysis failed");
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }
}
