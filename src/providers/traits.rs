//! Provider trait for analysis backends.
//!
//! Upstream backends (a hosted model) and the local rule classifier share one
//! seam, so decorators like [`RetryingProvider`](super::retry::RetryingProvider)
//! and the [`ProviderRegistry`](super::registry::ProviderRegistry) fallback
//! chain work over any of them.
//!
//! # Fallback Semantics
//!
//! Any error returned from `analyze` makes the registry move on to the next
//! provider, and finally to the rule classifier. A provider must only return
//! `Ok` with a result that already passed schema validation.

use async_trait::async_trait;

use crate::Result;
use crate::classifier::RuleClassifier;
use crate::types::{ClassificationInput, ClassificationResult};

/// A backend that can produce a verdict for some content.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Provider name for logging/metrics.
    fn name(&self) -> &str;

    /// Analyze one input.
    async fn analyze(&self, input: &ClassificationInput) -> Result<ClassificationResult>;
}

/// The rule classifier exposed as a provider. Never fails.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedProvider {
    classifier: RuleClassifier,
}

impl RuleBasedProvider {
    pub fn new(classifier: RuleClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &RuleClassifier {
        &self.classifier
    }
}

#[async_trait]
impl AnalysisProvider for RuleBasedProvider {
    fn name(&self) -> &str {
        "rules"
    }

    async fn analyze(&self, input: &ClassificationInput) -> Result<ClassificationResult> {
        Ok(self.classifier.classify(input))
    }
}
