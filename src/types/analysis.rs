//! Pipeline output: a verdict plus where it came from.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::verdict::ClassificationResult;

/// Which path produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    /// A remote model backend answered and its reply passed validation.
    Upstream,
    /// The deterministic rule classifier answered.
    Fallback,
}

impl AnalysisSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisSource::Upstream => "upstream",
            AnalysisSource::Fallback => "fallback",
        }
    }
}

/// A verdict as returned to callers.
///
/// Serializes as the flat [`ClassificationResult`] object with three extra
/// fields: `source`, `provider` and `analyzedAt` (unix millis).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    #[serde(flatten)]
    pub result: ClassificationResult,
    pub source: AnalysisSource,
    /// Provider name (`"rules"` for the fallback classifier).
    pub provider: String,
    pub analyzed_at: u64,
}

impl Analysis {
    /// Wrap a verdict, stamping it with the current time.
    pub fn new(result: ClassificationResult, source: AnalysisSource, provider: &str) -> Self {
        Self {
            result,
            source,
            provider: provider.to_string(),
            analyzed_at: now_millis(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == AnalysisSource::Fallback
    }
}

/// Milliseconds since the unix epoch (0 if the clock is before 1970).
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
