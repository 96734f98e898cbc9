//! Google Gemini `generateContent` client.
//!
//! Sends a single-turn prompt built from the [`Catalog`] schema description
//! and the message under analysis, then hands the reply text to
//! [`decode_verdict_with`](super::decode::decode_verdict_with).
//! See: <https://ai.google.dev/api/generate-content>

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::decode::decode_verdict_with;
use super::traits::AnalysisProvider;
use crate::catalog::Catalog;
use crate::types::{ClassificationInput, ClassificationResult};
use crate::{Result, ScamGuardError};

/// Default base URL for the Generative Language API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Message text beyond this many characters is not sent.
pub const MAX_PROMPT_CHARS: usize = 10_000;

/// Placeholder key shipped in sample configs; treated as "no key".
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

const ANALYST_PREAMBLE: &str = "You are an expert AI security analyst specializing in detecting \
financial scams, phishing attempts, and fraudulent messages. Your role is to protect users from \
malicious content.\n\nAnalyze the provided message.";

const ANALYST_CLOSING: &str =
    "Be thorough but concise. If the message appears safe, still explain why.";

/// Whether a configured key is usable (non-blank, not the placeholder).
pub fn is_usable_api_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != PLACEHOLDER_API_KEY
}

/// Connection and sampling settings for [`GeminiClient`].
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    /// Low for consistent verdicts. Default: 0.2.
    pub temperature: f32,
    /// Rule set whose labels are described to the model.
    pub catalog: Catalog,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            temperature: 0.2,
            catalog: Catalog::default(),
        }
    }

    /// Override the API base URL (e.g. a wiremock server in tests).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model name used in the request path.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the rule catalog described to the model and used to check reply scores.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    config: GeminiConfig,
    http: Client,
}

impl GeminiClient {
    /// Create a client with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(GeminiConfig::new(api_key))
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(GeminiConfig::new(api_key).base_url(base_url))
    }

    pub fn from_config(config: GeminiConfig) -> Result<Self> {
        if !is_usable_api_key(&config.api_key) {
            return Err(ScamGuardError::Configuration(
                "Gemini API key is empty or a placeholder".to_string(),
            ));
        }
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ScamGuardError::Configuration(format!("HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Full prompt text for an input.
    pub fn build_prompt(&self, input: &ClassificationInput) -> String {
        let mut message = truncate_chars(&input.text, MAX_PROMPT_CHARS).to_string();
        for attachment in &input.attachments {
            let mime = if attachment.mime_type.is_empty() {
                "unknown type"
            } else {
                attachment.mime_type.as_str()
            };
            message.push_str(&format!("\n\n[Attached file: {} ({mime})]", attachment.name));
        }

        format!(
            "{ANALYST_PREAMBLE}\n\n{}\n\n{ANALYST_CLOSING}\n\n---\n\nMessage to analyze:\n{message}",
            self.config.catalog.schema_description()
        )
    }

    /// Ask the model for a verdict.
    pub async fn analyze(&self, input: &ClassificationInput) -> Result<ClassificationResult> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let prompt = self.build_prompt(input);

        debug!(model = %self.config.model, prompt_chars = prompt.len(), "sending generateContent");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&GenerateContentRequest {
                contents: [RequestContent {
                    parts: [RequestPart { text: &prompt }],
                }],
                generation_config: GenerationConfig {
                    temperature: self.config.temperature,
                    top_p: 0.8,
                    top_k: 40,
                    response_mime_type: "application/json",
                },
            })
            .send()
            .await
            .map_err(|e| ScamGuardError::Http(e.to_string()))?;

        let response = self.handle_response_errors(response).await?;

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ScamGuardError::Decode(format!("invalid generateContent body: {e}")))?;

        decode_verdict_with(&body.into_text()?, &self.config.catalog.scoring)
    }

    /// Check response status and map to the appropriate error.
    async fn handle_response_errors(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            401 | 403 => Err(ScamGuardError::AuthenticationFailed),
            404 => Err(ScamGuardError::ModelNotFound(self.config.model.clone())),
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(ScamGuardError::RateLimited { retry_after })
            }
            code => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorBody>(&body)
                    .map(|b| b.error.message)
                    .unwrap_or_else(|_| format!("Gemini API error: {status}"));
                Err(ScamGuardError::Api {
                    status: code,
                    message,
                })
            }
        }
    }
}

/// Cut `text` to at most `max` characters without splitting a code point.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    fn into_text(self) -> Result<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ScamGuardError::ContentFiltered { reason });
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(ScamGuardError::EmptyResponse)?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_default();
            return if matches!(reason.as_str(), "SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT") {
                Err(ScamGuardError::ContentFiltered { reason })
            } else {
                Err(ScamGuardError::EmptyResponse)
            };
        }
        Ok(text)
    }
}

// ============================================================================
// Provider Trait Implementation
// ============================================================================

#[async_trait]
impl AnalysisProvider for GeminiClient {
    fn name(&self) -> &str {
        "google"
    }

    async fn analyze(&self, input: &ClassificationInput) -> Result<ClassificationResult> {
        GeminiClient::analyze(self, input).await
    }
}
