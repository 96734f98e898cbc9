//! Integration tests for the Gemini client using wiremock.

#![cfg(feature = "google")]

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scamguard::providers::google::{GeminiClient, GeminiConfig};
use scamguard::{ClassificationInput, RiskLevel, ScamGuardError, Similarity};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn verdict_json() -> serde_json::Value {
    json!({
        "riskLevel": "suspicious",
        "score": 60,
        "scamType": "Investment Scam",
        "riskIndicators": ["Upfront Payment Request"],
        "similarity": "Medium",
        "reasons": ["Promises unrealistic returns"],
        "advice": "Do not send money.",
        "simplifiedExplanation": "Someone wants your money for a fake investment."
    })
}

/// Wrap model text in a generateContent response body.
fn gemini_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

async fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::with_base_url("test-key", server.uri()).unwrap()
}

fn input() -> ClassificationInput {
    ClassificationInput::text("Double your crypto in a week")
}

#[tokio::test]
async fn analyze_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gemini_body(&verdict_json().to_string())),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).await.analyze(&input()).await.unwrap();

    assert_eq!(result.risk_level, RiskLevel::Suspicious);
    assert_eq!(result.score, 60);
    assert_eq!(result.scam_type, "Investment Scam");
    assert_eq!(result.risk_indicators, vec!["Upfront Payment Request"]);
    assert_eq!(result.similarity, Similarity::Medium);
    assert_eq!(result.advice, "Do not send money.");
}

#[tokio::test]
async fn analyze_joins_split_parts() {
    let server = MockServer::start().await;
    let text = verdict_json().to_string();
    let (head, tail) = text.split_at(text.len() / 2);

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": head }, { "text": tail }] }
            }]
        })))
        .mount(&server)
        .await;

    let result = client_for(&server).await.analyze(&input()).await.unwrap();
    assert_eq!(result.score, 60);
}

#[tokio::test]
async fn analyze_uses_configured_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-pro:generateContent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gemini_body(&verdict_json().to_string())),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::from_config(
        GeminiConfig::new("test-key")
            .base_url(server.uri())
            .model("gemini-2.5-pro"),
    )
    .unwrap();
    assert_eq!(client.model(), "gemini-2.5-pro");
    client.analyze(&input()).await.unwrap();
}

#[tokio::test]
async fn analyze_sends_attachment_metadata_in_prompt() {
    let server = MockServer::start().await;
    let input = ClassificationInput::text("see file").with_attachment("invoice.pdf", "application/pdf");
    let client = client_for(&server).await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": client.build_prompt(&input) }] }]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gemini_body(&verdict_json().to_string())),
        )
        .expect(1)
        .mount(&server)
        .await;

    client.analyze(&input).await.unwrap();
}

// ============================================================================
// Error mapping
// ============================================================================

#[tokio::test]
async fn analyze_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server).await.analyze(&input()).await.unwrap_err();
    assert!(matches!(err, ScamGuardError::AuthenticationFailed));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn analyze_model_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).await.analyze(&input()).await.unwrap_err();
    assert!(matches!(err, ScamGuardError::ModelNotFound(ref m) if m == "gemini-2.0-flash"));
}

#[tokio::test]
async fn analyze_rate_limited_with_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.analyze(&input()).await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(err.retry_after(), Some(std::time::Duration::from_secs(7)));
}

#[tokio::test]
async fn analyze_server_error_carries_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "code": 500, "message": "backend overloaded", "status": "INTERNAL" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).await.analyze(&input()).await.unwrap_err();
    match &err {
        ScamGuardError::Api { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "backend overloaded");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn analyze_bad_request_is_permanent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("nope"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.analyze(&input()).await.unwrap_err();
    assert!(matches!(err, ScamGuardError::Api { status: 400, .. }));
    assert!(!err.is_transient());
}

// ============================================================================
// Reply validation
// ============================================================================

#[tokio::test]
async fn analyze_rejects_non_json_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body("I think it's fine.")))
        .mount(&server)
        .await;

    let err = client_for(&server).await.analyze(&input()).await.unwrap_err();
    assert!(matches!(err, ScamGuardError::Decode(_)));
}

#[tokio::test]
async fn analyze_rejects_unknown_risk_level() {
    let server = MockServer::start().await;
    let mut verdict = verdict_json();
    verdict["riskLevel"] = json!("critical");

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(&verdict.to_string())))
        .mount(&server)
        .await;

    let err = client_for(&server).await.analyze(&input()).await.unwrap_err();
    assert!(matches!(err, ScamGuardError::Decode(_)));
}

#[tokio::test]
async fn analyze_rejects_malformed_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).await.analyze(&input()).await.unwrap_err();
    assert!(matches!(err, ScamGuardError::Decode(_)));
}

#[tokio::test]
async fn analyze_empty_candidates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server).await.analyze(&input()).await.unwrap_err();
    assert!(matches!(err, ScamGuardError::EmptyResponse));
}

#[tokio::test]
async fn analyze_blocked_prompt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).await.analyze(&input()).await.unwrap_err();
    assert!(matches!(err, ScamGuardError::ContentFiltered { ref reason } if reason == "SAFETY"));
}

#[tokio::test]
async fn analyze_safety_stop_without_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).await.analyze(&input()).await.unwrap_err();
    assert!(matches!(err, ScamGuardError::ContentFiltered { .. }));
}
