//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (prometheus, statsd, ...);
//! without a recorder installed, all metric calls are no-ops.
//!
//! All metrics are prefixed with `scamguard_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider` — upstream provider name (e.g. "google")
//! - `status` — outcome: "ok" or "error"
//! - `risk_level` — "safe", "suspicious" or "high-risk"
//! - `source` — "upstream" or "fallback"

/// Total upstream analysis requests.
///
/// Labels: `provider`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "scamguard_requests_total";

/// Upstream request duration in seconds.
///
/// Labels: `provider`.
pub const REQUEST_DURATION_SECONDS: &str = "scamguard_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `provider`.
pub const RETRIES_TOTAL: &str = "scamguard_retries_total";

/// Total analyses answered by the rule classifier instead of upstream.
///
/// Labels: `reason` ("no_provider" | "upstream_error").
pub const FALLBACKS_TOTAL: &str = "scamguard_fallbacks_total";

/// Total verdicts handed back to callers.
///
/// Labels: `risk_level`, `source`.
pub const CLASSIFICATIONS_TOTAL: &str = "scamguard_classifications_total";

/// Total response cache hits.
pub const CACHE_HITS_TOTAL: &str = "scamguard_cache_hits_total";

/// Total response cache misses.
pub const CACHE_MISSES_TOTAL: &str = "scamguard_cache_misses_total";
