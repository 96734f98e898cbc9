//! Strict decoding of model replies into [`ClassificationResult`].
//!
//! The model answers in free-form text that should contain one JSON object.
//! Everything that comes back is validated here before it reaches the rest of
//! the crate: either a fully-typed result, or a [`ScamGuardError::Decode`]
//! that sends the caller down the fallback path.

use serde::Deserialize;

use crate::catalog::{Catalog, Scoring};
use crate::types::{ClassificationResult, RiskLevel, Similarity};
use crate::{Result, ScamGuardError};

/// Wire shape of the model's JSON object. Enum fields reject unknown values.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireVerdict {
    risk_level: RiskLevel,
    score: f64,
    scam_type: String,
    risk_indicators: Vec<String>,
    similarity: Similarity,
    #[serde(default)]
    reasons: Vec<String>,
    advice: String,
    simplified_explanation: String,
}

/// Extract, parse and validate a verdict from model output text, checking
/// the score against the standard catalog's bands.
pub fn decode_verdict(text: &str) -> Result<ClassificationResult> {
    decode_verdict_with(text, &Catalog::standard().scoring)
}

/// Like [`decode_verdict`], with the score bands of a custom catalog.
///
/// A score outside [`Scoring::accepted_band`] for the claimed `riskLevel`
/// is rejected.
pub fn decode_verdict_with(text: &str, scoring: &Scoring) -> Result<ClassificationResult> {
    let json = extract_json_object(text)
        .ok_or_else(|| ScamGuardError::Decode("no JSON object in model reply".to_string()))?;

    let wire: WireVerdict = serde_json::from_str(json)
        .map_err(|e| ScamGuardError::Decode(format!("reply does not match schema: {e}")))?;

    validate(wire, scoring)
}

/// Slice from the first `{` to the last `}`, inclusive.
///
/// Tolerates prose or markdown code fences around the object.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn validate(wire: WireVerdict, scoring: &Scoring) -> Result<ClassificationResult> {
    if !wire.score.is_finite() || !(0.0..=100.0).contains(&wire.score) {
        return Err(ScamGuardError::Decode(format!(
            "score {} outside 0-100",
            wire.score
        )));
    }
    let score = wire.score.round() as u8;

    let accepted = scoring.accepted_band(wire.risk_level);
    if !accepted.contains(&score) {
        return Err(ScamGuardError::Decode(format!(
            "score {score} inconsistent with {} (expected {}-{})",
            wire.risk_level,
            accepted.start(),
            accepted.end()
        )));
    }

    let risk_indicators: Vec<String> = wire
        .risk_indicators
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if risk_indicators.is_empty() {
        return Err(ScamGuardError::Decode(
            "riskIndicators must not be empty".to_string(),
        ));
    }

    let scam_type = required("scamType", wire.scam_type)?;
    let advice = required("advice", wire.advice)?;
    let simplified_explanation = required("simplifiedExplanation", wire.simplified_explanation)?;

    Ok(ClassificationResult {
        risk_level: wire.risk_level,
        score,
        scam_type,
        risk_indicators,
        similarity: wire.similarity,
        reasons: wire.reasons,
        advice,
        simplified_explanation,
    })
}

fn required(field: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ScamGuardError::Decode(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}
