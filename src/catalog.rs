//! Rule catalog: every keyword list, label and threshold the classifier uses.
//!
//! The catalog is plain data. The rule classifier evaluates it and the
//! upstream prompt builder renders it (see [`Catalog::schema_description`]),
//! so the fallback path and the model are always described by the same
//! labels.
//!
//! All trigger strings are lower-case; they are matched as substrings of
//! lower-cased text.

use std::fmt::Write as _;
use std::ops::RangeInclusive;

use crate::types::RiskLevel;

/// How a category rule decides whether it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// Fires when the lower-cased text contains any of the substrings.
    AnyOf(&'static [&'static str]),
    /// Fires when at least one attachment looked suspicious.
    FileRisk,
}

impl Matcher {
    /// Evaluate against already lower-cased text.
    pub fn matches(&self, lowered: &str, file_risk: bool) -> bool {
        match self {
            Matcher::AnyOf(triggers) => triggers.iter().any(|t| lowered.contains(t)),
            Matcher::FileRisk => file_risk,
        }
    }
}

/// A labelled rule (scam type or indicator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    pub label: &'static str,
    pub matcher: Matcher,
}

impl CategoryRule {
    pub const fn text(label: &'static str, triggers: &'static [&'static str]) -> Self {
        Self {
            label,
            matcher: Matcher::AnyOf(triggers),
        }
    }

    pub const fn file_risk(label: &'static str) -> Self {
        Self {
            label,
            matcher: Matcher::FileRisk,
        }
    }
}

/// Score arithmetic for each risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scoring {
    pub high_risk_base: u32,
    pub high_risk_step: u32,
    pub high_risk_cap: u32,
    pub suspicious_base: u32,
    pub suspicious_step: u32,
    pub safe: u32,
    pub safe_with_attachments: u32,
}

/// Every computed score is clamped to this.
pub const MAX_SCORE: u32 = 100;

impl Scoring {
    /// `min(cap, base + step * count)`, then clamped to [`MAX_SCORE`].
    pub fn high_risk(&self, high_risk_count: usize) -> u8 {
        let raw = self
            .high_risk_base
            .saturating_add(self.high_risk_step.saturating_mul(count_u32(high_risk_count)));
        clamp_score(raw.min(self.high_risk_cap))
    }

    /// `base + step * count`, clamped to [`MAX_SCORE`].
    pub fn suspicious(&self, suspicious_count: usize) -> u8 {
        let raw = self
            .suspicious_base
            .saturating_add(self.suspicious_step.saturating_mul(count_u32(suspicious_count)));
        clamp_score(raw)
    }

    pub fn safe(&self, has_attachments: bool) -> u8 {
        if has_attachments {
            clamp_score(self.safe_with_attachments)
        } else {
            clamp_score(self.safe)
        }
    }

    /// Range of scores the classifier can emit for a level.
    pub fn band(&self, level: RiskLevel) -> RangeInclusive<u8> {
        match level {
            RiskLevel::Safe => 0..=clamp_score(self.safe.max(self.safe_with_attachments)),
            RiskLevel::Suspicious => clamp_score(self.suspicious_base)..=clamp_score(MAX_SCORE),
            RiskLevel::HighRisk => {
                clamp_score(self.high_risk_base.min(self.high_risk_cap))
                    ..=clamp_score(self.high_risk_cap)
            }
        }
    }

    /// Range of scores an upstream verdict may carry for a level.
    ///
    /// Wider than [`Scoring::band`]: safe may run [`UPSTREAM_SAFE_SLACK`] above
    /// the rule scores, and both risky levels may go up to [`MAX_SCORE`]. A
    /// safe score never reaches the suspicious floor.
    pub fn accepted_band(&self, level: RiskLevel) -> RangeInclusive<u8> {
        let band = self.band(level);
        match level {
            RiskLevel::Safe => {
                let ceiling = u32::from(*band.end()).saturating_add(UPSTREAM_SAFE_SLACK);
                let below_suspicious = self.suspicious_base.saturating_sub(1);
                0..=clamp_score(ceiling.min(below_suspicious))
            }
            RiskLevel::Suspicious | RiskLevel::HighRisk => *band.start()..=clamp_score(MAX_SCORE),
        }
    }
}

/// Extra headroom above the safe rule scores allowed in upstream verdicts.
pub const UPSTREAM_SAFE_SLACK: u32 = 10;

fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn clamp_score(raw: u32) -> u8 {
    raw.min(MAX_SCORE) as u8
}

/// Fixed reason, advice and template strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wording {
    pub high_risk_reason: &'static str,
    pub urgency_reason: &'static str,
    pub suspicious_reason: &'static str,
    pub safe_reason: &'static str,
    pub safe_with_attachments_reason: &'static str,
    pub high_risk_advice: &'static str,
    pub suspicious_advice: &'static str,
    pub safe_advice: &'static str,
    /// Quoted in the explanation when no indicator is available.
    pub fallback_explanation_word: &'static str,
}

impl Wording {
    /// One reason line per suspicious attachment.
    pub fn attachment_reason(&self, file_name: &str) -> String {
        format!("Suspicious file name detected: \"{file_name}\"")
    }

    pub fn explanation(&self, scam_type: &str, indicator: Option<&str>) -> String {
        let word = indicator.unwrap_or(self.fallback_explanation_word);
        format!(
            "This looks like a {scam_type}. Scammers use words like \"{word}\" to trick you. Don't reply."
        )
    }

    pub fn advice(&self, level: RiskLevel) -> &'static str {
        match level {
            RiskLevel::HighRisk => self.high_risk_advice,
            RiskLevel::Suspicious => self.suspicious_advice,
            RiskLevel::Safe => self.safe_advice,
        }
    }
}

/// The complete, immutable rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// Attachment names containing any of these are suspicious.
    pub attachment_denylist: &'static [&'static str],
    /// General phishing/authority words.
    pub suspicious_keywords: &'static [&'static str],
    /// Financial/credential words.
    pub high_risk_keywords: &'static [&'static str],
    /// Adds the urgency reason to high-risk verdicts.
    pub urgency_keyword: &'static str,
    /// First match wins.
    pub scam_types: &'static [CategoryRule],
    /// Used when no scam-type rule fires and the verdict is not safe.
    pub unknown_scam_type: &'static str,
    /// Used when no scam-type rule fires and the verdict is safe.
    pub not_a_scam: &'static str,
    /// All matches kept, in order.
    pub indicators: &'static [CategoryRule],
    /// Emitted alone when no indicator fires.
    pub default_indicator: &'static str,
    pub scoring: Scoring,
    pub wording: Wording,
}

/// The built-in rule set.
pub static STANDARD: Catalog = Catalog {
    attachment_denylist: &["winner", "lottery", "urgent", "apk"],
    suspicious_keywords: &[
        "verify",
        "account",
        "security",
        "click",
        "link",
        "update",
        "suspended",
        "kyc",
    ],
    high_risk_keywords: &[
        "urgent",
        "password",
        "winner",
        "lottery",
        "transfer",
        "bank",
        "ssn",
        "credit card",
        "otp",
    ],
    urgency_keyword: "urgent",
    scam_types: &[
        CategoryRule::text(
            "Bank / Authority Impersonation",
            &["bank", "kyc", "verify", "account blocked"],
        ),
        CategoryRule::text("Investment Scam", &["invest", "profit", "crypto", "return"]),
        CategoryRule::text(
            "Prize / Reward Scam",
            &["winner", "lottery", "prize", "reward"],
        ),
        CategoryRule::text("Job / Employment Scam", &["job", "hiring", "salary"]),
        CategoryRule::file_risk("Malicious File Attachment"),
    ],
    unknown_scam_type: "Unknown Suspicious Activity",
    not_a_scam: "Not a Scam",
    indicators: &[
        CategoryRule::text(
            "Urgency or Pressure to Act",
            &["urgent", "immediately", "24 hours"],
        ),
        CategoryRule::text("Suspicious Link Request", &["link", "click", "http"]),
        CategoryRule::text(
            "Request for Sensitive Credentials",
            &["password", "otp", "pin"],
        ),
        CategoryRule::text("Upfront Payment Request", &["pay", "transfer", "fee"]),
        CategoryRule::file_risk("Suspicious File Metadata"),
    ],
    default_indicator: "Unusual language patterns",
    scoring: Scoring {
        high_risk_base: 85,
        high_risk_step: 5,
        high_risk_cap: 99,
        suspicious_base: 45,
        suspicious_step: 10,
        safe: 10,
        safe_with_attachments: 20,
    },
    wording: Wording {
        high_risk_reason: "Contains high-risk triggers often used in scams.",
        urgency_reason: "Uses urgency to pressure immediate action.",
        suspicious_reason: "Contains keywords commonly found in phishing attempts.",
        safe_reason: "No common scam keywords or patterns detected.",
        safe_with_attachments_reason: "Files attached but no obvious threats detected.",
        high_risk_advice: "Do NOT click any links. Block the sender immediately.",
        suspicious_advice: "Proceed with caution. Verify the sender's identity.",
        safe_advice: "No immediate threats detected. Always stay vigilant.",
        fallback_explanation_word: "urgent",
    },
};

impl Catalog {
    /// The built-in rule set.
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    /// Whether an attachment name hits the denylist (case-insensitive).
    pub fn is_suspicious_attachment(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.attachment_denylist
            .iter()
            .any(|needle| lowered.contains(needle))
    }

    /// Every scam-type label the classifier can emit, in priority order.
    pub fn scam_type_labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.scam_types
            .iter()
            .map(|rule| rule.label)
            .chain([self.unknown_scam_type, self.not_a_scam])
    }

    /// Every indicator label the classifier can emit, in catalog order.
    pub fn indicator_labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.indicators
            .iter()
            .map(|rule| rule.label)
            .chain(std::iter::once(self.default_indicator))
    }

    /// Output-schema documentation for the upstream model.
    ///
    /// Lists field names, allowed enum values, score bands and the labels
    /// above, so the model and the rule classifier speak the same vocabulary.
    pub fn schema_description(&self) -> String {
        let band = |level: RiskLevel| {
            let range = self.scoring.band(level);
            format!("{}-{}", range.start(), range.end())
        };

        let mut out = String::new();
        let _ = writeln!(out, "Respond with a single JSON object containing:");
        let _ = writeln!(
            out,
            "- riskLevel: one of \"{}\", \"{}\", \"{}\"",
            RiskLevel::Safe,
            RiskLevel::Suspicious,
            RiskLevel::HighRisk
        );
        let _ = writeln!(
            out,
            "- score: an integer 0-100 (0 = completely safe, 100 = definite scam); \
             safe is usually {}, suspicious {}, high-risk {}",
            band(RiskLevel::Safe),
            band(RiskLevel::Suspicious),
            band(RiskLevel::HighRisk)
        );
        let _ = writeln!(
            out,
            "- scamType: one of {}",
            quote_all(self.scam_type_labels())
        );
        let _ = writeln!(
            out,
            "- riskIndicators: non-empty array of red flags, e.g. {}",
            quote_all(self.indicator_labels())
        );
        let _ = writeln!(
            out,
            "- similarity: \"Low\", \"Medium\" or \"High\" based on how closely it matches known scam patterns"
        );
        let _ = writeln!(out, "- reasons: array of detailed explanations for your assessment");
        let _ = writeln!(out, "- advice: clear, actionable recommendation for the user");
        let _ = write!(
            out,
            "- simplifiedExplanation: a simple, non-technical explanation suitable for elderly users"
        );
        out
    }
}

fn quote_all<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels
        .map(|l| format!("\"{l}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Default for Catalog {
    fn default() -> Self {
        STANDARD.clone()
    }
}
