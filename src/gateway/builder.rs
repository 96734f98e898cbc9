//! Builder for configuring detector instances

use std::sync::Arc;

use tracing::debug;

use super::Detector;
use crate::Result;
use crate::cache::{CacheConfig, ResponseCache};
use crate::catalog::Catalog;
use crate::classifier::RuleClassifier;
use crate::providers::{AnalysisProvider, ProviderRegistry, RetryConfig};

/// Main entry point for creating detector instances.
pub struct ScamGuard;

impl ScamGuard {
    /// Create a new builder for configuring the detector.
    pub fn builder() -> ScamGuardBuilder {
        ScamGuardBuilder::new()
    }
}

/// Builder for configuring detector instances.
///
/// With no upstream configured the detector answers every request with the
/// rule classifier.
///
/// ```rust
/// # use scamguard::{ScamGuard, RetryConfig};
/// let detector = ScamGuard::builder()
///     .retry(RetryConfig::disabled())
///     .build()
///     .unwrap();
/// assert!(!detector.has_upstream());
/// ```
pub struct ScamGuardBuilder {
    google_key: Option<String>,
    #[cfg_attr(not(feature = "google"), allow(dead_code))]
    google_model: Option<String>,
    #[cfg_attr(not(feature = "google"), allow(dead_code))]
    google_base_url: Option<String>,
    #[cfg_attr(not(feature = "google"), allow(dead_code))]
    timeout_secs: Option<u64>,
    retry: RetryConfig,
    response_cache: Option<CacheConfig>,
    catalog: Catalog,
    extra_providers: Vec<Arc<dyn AnalysisProvider>>,
}

impl ScamGuardBuilder {
    pub fn new() -> Self {
        Self {
            google_key: None,
            google_model: None,
            google_base_url: None,
            timeout_secs: None,
            retry: RetryConfig::default(),
            response_cache: None,
            catalog: Catalog::default(),
            extra_providers: Vec::new(),
        }
    }

    /// Configure the Google (Gemini) upstream.
    ///
    /// Blank keys and the `YOUR_API_KEY_HERE` placeholder count as no key.
    pub fn google(mut self, api_key: impl Into<String>) -> Self {
        self.google_key = Some(api_key.into());
        self
    }

    /// Override the Gemini model name.
    pub fn google_model(mut self, model: impl Into<String>) -> Self {
        self.google_model = Some(model.into());
        self
    }

    /// Override the Gemini API base URL.
    pub fn google_base_url(mut self, url: impl Into<String>) -> Self {
        self.google_base_url = Some(url.into());
        self
    }

    /// Register an additional upstream provider after the built-in ones.
    pub fn provider(mut self, provider: Arc<dyn AnalysisProvider>) -> Self {
        self.extra_providers.push(provider);
        self
    }

    /// Set the upstream request timeout (seconds).
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Retry behaviour for upstream providers. Default: 3 attempts.
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Enable the response cache for upstream verdicts.
    pub fn response_cache(mut self, config: CacheConfig) -> Self {
        self.response_cache = Some(config);
        self
    }

    /// Use a custom rule catalog for the fallback classifier and the prompt.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Build the detector.
    pub fn build(self) -> Result<Detector> {
        let mut registry =
            ProviderRegistry::with_fallback(RuleClassifier::with_catalog(self.catalog.clone()));
        registry.set_retry_config(self.retry.clone());

        #[cfg(feature = "google")]
        if let Some(key) = self.google_key.as_deref() {
            if crate::providers::google::is_usable_api_key(key) {
                registry.add(Arc::new(self.gemini_client(key)?));
            } else {
                debug!("Gemini API key is blank or a placeholder; upstream disabled");
            }
        }
        #[cfg(not(feature = "google"))]
        if self.google_key.is_some() {
            debug!("built without the `google` feature; ignoring Gemini key");
        }

        for provider in self.extra_providers {
            registry.add(provider);
        }

        let cache = self
            .response_cache
            .as_ref()
            .map(|config| ResponseCache::new(config, &registry.provider_names()));

        Ok(Detector::new(registry, cache))
    }

    #[cfg(feature = "google")]
    fn gemini_client(&self, key: &str) -> Result<crate::providers::GeminiClient> {
        use crate::providers::{GeminiClient, GeminiConfig};

        let mut config = GeminiConfig::new(key).catalog(self.catalog.clone());
        if let Some(model) = &self.google_model {
            config = config.model(model.clone());
        }
        if let Some(url) = &self.google_base_url {
            config = config.base_url(url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.timeout(std::time::Duration::from_secs(secs));
        }
        GeminiClient::from_config(config)
    }
}

impl Default for ScamGuardBuilder {
    fn default() -> Self {
        Self::new()
    }
}
