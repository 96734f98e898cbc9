//! Detector: the public analysis entry point.

use tracing::instrument;

use crate::cache::ResponseCache;
use crate::catalog::Catalog;
use crate::providers::ProviderRegistry;
use crate::types::{Analysis, ClassificationInput, ClassificationResult, now_millis};

/// Analyzes content with the configured upstream chain and falls back to the
/// rule classifier. Create one with [`ScamGuard::builder()`](super::ScamGuard::builder).
pub struct Detector {
    registry: ProviderRegistry,
    cache: Option<ResponseCache>,
}

impl Detector {
    pub(crate) fn new(registry: ProviderRegistry, cache: Option<ResponseCache>) -> Self {
        Self { registry, cache }
    }

    /// Analyze content. Never fails: upstream problems end in a fallback
    /// verdict.
    ///
    /// A cached verdict is returned with `analyzed_at` set to the time of
    /// this call.
    #[instrument(skip_all, fields(upstream = self.registry.has_upstream()))]
    pub async fn analyze(&self, input: &ClassificationInput) -> Analysis {
        let cache = self.cache.as_ref().filter(|_| self.registry.has_upstream());

        if let Some(cache) = cache
            && let Some(mut hit) = cache.get(input).await
        {
            hit.analyzed_at = now_millis();
            return hit;
        }

        let analysis = self.registry.analyze(input).await;

        if let Some(cache) = cache {
            cache.insert(input, &analysis).await;
        }
        analysis
    }

    /// Classify with the rule classifier only, bypassing every upstream.
    pub fn classify(&self, input: &ClassificationInput) -> ClassificationResult {
        self.registry.fallback().classify(input)
    }

    /// Whether an upstream provider is configured.
    pub fn has_upstream(&self) -> bool {
        self.registry.has_upstream()
    }

    /// Upstream provider names in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    /// The rule catalog in use.
    pub fn catalog(&self) -> &Catalog {
        self.registry.fallback().catalog()
    }
}
