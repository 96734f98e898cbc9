//! Opt-in cache for upstream verdicts.
//!
//! [`ResponseCache`] remembers analyses that came back from an upstream
//! provider, so re-submitting the same message does not pay for another
//! model call. Fallback verdicts are never stored: the rule classifier is
//! cheap, and a cached fallback would hide a recovered upstream.
//!
//! # Architecture
//!
//! The cache sits in [`Detector`](crate::gateway::Detector), above the
//! [`ProviderRegistry`](crate::providers::ProviderRegistry) fallback chain.
//! A hit bypasses retry logic and provider metrics entirely. Cache hit/miss
//! metrics are emitted separately.
//!
//! Keys hash the provider chain together with the full input (text and
//! every attachment's name and MIME type), so two detectors with different
//! upstreams never share entries.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use moka::future::Cache;

use crate::telemetry;
use crate::types::{Analysis, AnalysisSource, ClassificationInput};

/// Configuration for the response cache.
///
/// Pass to [`ScamGuardBuilder::response_cache()`](crate::ScamGuardBuilder::response_cache)
/// to activate. Without this, no cache is allocated.
///
/// ```rust
/// # use scamguard::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(500)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 1,000.
    pub max_entries: u64,
    /// Time-to-live for cached entries. Default: 1 hour.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// In-memory LRU + TTL cache of upstream analyses.
pub struct ResponseCache {
    cache: Cache<u64, Analysis>,
    chain: String,
}

impl ResponseCache {
    /// Create a cache for a detector whose upstream chain is `chain`
    /// (provider names in priority order).
    pub fn new(config: &CacheConfig, chain: &[String]) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self {
            cache,
            chain: chain.join(","),
        }
    }

    /// Look up a cached analysis.
    ///
    /// Returns `None` on cache miss. Emits cache hit/miss metrics.
    pub async fn get(&self, input: &ClassificationInput) -> Option<Analysis> {
        let key = cache_key(&self.chain, input);
        match self.cache.get(&key).await {
            Some(analysis) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(analysis)
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Store an analysis. Fallback analyses are ignored.
    pub async fn insert(&self, input: &ClassificationInput, analysis: &Analysis) {
        if analysis.source != AnalysisSource::Upstream {
            return;
        }
        let key = cache_key(&self.chain, input);
        self.cache.insert(key, analysis.clone()).await;
    }

    /// Number of entries (approximate until pending tasks run).
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

/// Hash of the provider chain and the input.
///
/// `DefaultHasher` is deterministic within a process lifetime, which is
/// enough for an in-memory cache.
fn cache_key(chain: &str, input: &ClassificationInput) -> u64 {
    let mut hasher = DefaultHasher::new();
    chain.hash(&mut hasher);
    input.hash(&mut hasher);
    hasher.finish()
}
