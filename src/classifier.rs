//! Deterministic rule-based risk classifier.
//!
//! [`RuleClassifier::classify`] is a pure function of its input and the
//! [`Catalog`]: no I/O, no randomness, no state carried between calls. It is
//! total, so empty text and empty attachment lists still produce a verdict.
//!
//! Evaluation order:
//!
//! 1. attachment names against the denylist (`file_risk`)
//! 2. keyword counts for the suspicious and high-risk tiers
//! 3. risk level, score, reasons and advice (first matching band wins)
//! 4. scam type, independently of the level
//! 5. indicators, independently of the level
//! 6. similarity bucket from the indicator count
//! 7. simplified explanation

use tracing::trace;

use crate::catalog::Catalog;
use crate::types::{ClassificationInput, ClassificationResult, RiskLevel, Similarity};

/// Rule classifier over a fixed [`Catalog`].
#[derive(Debug, Clone, Default)]
pub struct RuleClassifier {
    catalog: Catalog,
}

/// Facts gathered from a single input before any verdict is assembled.
struct Evidence<'a> {
    lowered: String,
    suspicious_files: Vec<&'a str>,
    suspicious_count: usize,
    high_risk_count: usize,
    has_attachments: bool,
}

impl Evidence<'_> {
    fn file_risk(&self) -> bool {
        !self.suspicious_files.is_empty()
    }
}

impl RuleClassifier {
    /// Classifier over the built-in catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier over a custom catalog.
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Classify text and attachment metadata.
    pub fn classify(&self, input: &ClassificationInput) -> ClassificationResult {
        let evidence = self.gather(input);
        let file_risk = evidence.file_risk();

        let (risk_level, score, reasons) = self.assess(&evidence);
        let scam_type = self.scam_type(&evidence.lowered, file_risk, risk_level);
        let (risk_indicators, similarity) = self.indicators(&evidence.lowered, file_risk);

        trace!(
            %risk_level,
            score,
            suspicious = evidence.suspicious_count,
            high_risk = evidence.high_risk_count,
            file_risk,
            "rule classification"
        );

        let wording = &self.catalog.wording;
        let simplified_explanation =
            wording.explanation(scam_type, risk_indicators.first().map(String::as_str));

        ClassificationResult {
            risk_level,
            score,
            scam_type: scam_type.to_string(),
            risk_indicators,
            similarity,
            reasons,
            advice: wording.advice(risk_level).to_string(),
            simplified_explanation,
        }
    }

    fn gather<'a>(&self, input: &'a ClassificationInput) -> Evidence<'a> {
        let lowered = input.text.to_lowercase();
        let suspicious_files = input
            .attachments
            .iter()
            .filter(|a| self.catalog.is_suspicious_attachment(&a.name))
            .map(|a| a.name.as_str())
            .collect();
        let count = |keywords: &[&str]| keywords.iter().filter(|k| lowered.contains(*k)).count();

        Evidence {
            suspicious_count: count(self.catalog.suspicious_keywords),
            high_risk_count: count(self.catalog.high_risk_keywords),
            suspicious_files,
            has_attachments: input.has_attachments(),
            lowered,
        }
    }

    fn assess(&self, evidence: &Evidence<'_>) -> (RiskLevel, u8, Vec<String>) {
        let scoring = &self.catalog.scoring;
        let wording = &self.catalog.wording;

        if evidence.high_risk_count > 0 || evidence.file_risk() {
            let mut reasons = vec![wording.high_risk_reason.to_string()];
            reasons.extend(
                evidence
                    .suspicious_files
                    .iter()
                    .map(|name| wording.attachment_reason(name)),
            );
            if evidence.lowered.contains(self.catalog.urgency_keyword) {
                reasons.push(wording.urgency_reason.to_string());
            }
            (
                RiskLevel::HighRisk,
                scoring.high_risk(evidence.high_risk_count),
                reasons,
            )
        } else if evidence.suspicious_count > 0 {
            (
                RiskLevel::Suspicious,
                scoring.suspicious(evidence.suspicious_count),
                vec![wording.suspicious_reason.to_string()],
            )
        } else {
            let reason = if evidence.has_attachments {
                wording.safe_with_attachments_reason
            } else {
                wording.safe_reason
            };
            (
                RiskLevel::Safe,
                scoring.safe(evidence.has_attachments),
                vec![reason.to_string()],
            )
        }
    }

    fn scam_type(&self, lowered: &str, file_risk: bool, level: RiskLevel) -> &'static str {
        self.catalog
            .scam_types
            .iter()
            .find(|rule| rule.matcher.matches(lowered, file_risk))
            .map(|rule| rule.label)
            .unwrap_or(match level {
                RiskLevel::Safe => self.catalog.not_a_scam,
                _ => self.catalog.unknown_scam_type,
            })
    }

    fn indicators(&self, lowered: &str, file_risk: bool) -> (Vec<String>, Similarity) {
        let fired: Vec<String> = self
            .catalog
            .indicators
            .iter()
            .filter(|rule| rule.matcher.matches(lowered, file_risk))
            .map(|rule| rule.label.to_string())
            .collect();

        match fired.len() {
            0 => (
                vec![self.catalog.default_indicator.to_string()],
                Similarity::Low,
            ),
            1 => (fired, Similarity::Medium),
            _ => (fired, Similarity::High),
        }
    }
}

/// Classify with the built-in catalog.
pub fn classify(input: &ClassificationInput) -> ClassificationResult {
    RuleClassifier::new().classify(input)
}
