//! Classification result types.
//!
//! Field names and enum values serialize exactly as the upstream model is
//! asked to produce them, so both paths render through the same contract.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse three-way verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    Safe,
    Suspicious,
    HighRisk,
}

impl RiskLevel {
    /// Wire representation (`"safe"`, `"suspicious"`, `"high-risk"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Suspicious => "suspicious",
            RiskLevel::HighRisk => "high-risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How closely content resembles known scam patterns.
///
/// Derived from the number of indicators that fired, not from real matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Similarity {
    Low,
    Medium,
    High,
}

impl Similarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Similarity::Low => "Low",
            Similarity::Medium => "Medium",
            Similarity::High => "High",
        }
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured verdict for one piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub risk_level: RiskLevel,
    /// 0..=100, consistent with `risk_level`.
    pub score: u8,
    pub scam_type: String,
    /// Never empty.
    pub risk_indicators: Vec<String>,
    pub similarity: Similarity,
    pub reasons: Vec<String>,
    pub advice: String,
    pub simplified_explanation: String,
}

impl ClassificationResult {
    /// First indicator, used when summarizing the verdict.
    pub fn primary_indicator(&self) -> Option<&str> {
        self.risk_indicators.first().map(String::as_str)
    }

    pub fn is_safe(&self) -> bool {
        self.risk_level == RiskLevel::Safe
    }
}
