//! ScamGuard error types
//!
//! The rule classifier itself is total and never produces these; they come
//! from the upstream provider path, configuration loading and the history log.

use std::time::Duration;

/// ScamGuard error types
#[derive(Debug, thiserror::Error)]
pub enum ScamGuardError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Upstream reply did not match the classification schema.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("no upstream provider configured")]
    NoProvider,

    #[error("configuration error: {0}")]
    Configuration(String),

    // Soft errors
    #[error("empty response from model")]
    EmptyResponse,

    #[error("content filtered: {reason}")]
    ContentFiltered { reason: String },
}

impl ScamGuardError {
    /// Whether retrying the same request could plausibly succeed.
    ///
    /// Network failures, rate limits, 5xx/408 responses and empty replies are
    /// transient. Everything else (auth, schema violations, config) is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            ScamGuardError::Http(_)
            | ScamGuardError::RateLimited { .. }
            | ScamGuardError::EmptyResponse => true,
            ScamGuardError::Api { status, .. } => *status >= 500 || *status == 408,
            _ => false,
        }
    }

    /// Server-provided retry hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ScamGuardError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for ScamGuard operations
pub type Result<T> = std::result::Result<T, ScamGuardError>;
