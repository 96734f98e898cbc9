//! ScamGuard - scam risk classification for messages and attachments
//!
//! Content is sent to a hosted model (Gemini) when a key is configured. The
//! reply is validated strictly; anything unusable, and every network or
//! authentication failure, falls back to a deterministic rule classifier
//! over a fixed keyword [`Catalog`]. Callers always get a verdict.
//!
//! # Example
//!
//! ```rust,no_run
//! use scamguard::{ClassificationInput, ScamGuard};
//!
//! #[tokio::main]
//! async fn main() -> scamguard::Result<()> {
//!     let detector = ScamGuard::builder()
//!         .google("your-gemini-key")
//!         .build()?;
//!
//!     let input = ClassificationInput::text("URGENT: verify your bank account")
//!         .with_attachment("winner_notice.apk", "application/vnd.android.package-archive");
//!     let analysis = detector.analyze(&input).await;
//!
//!     println!("{} ({})", analysis.result.risk_level, analysis.result.score);
//!     Ok(())
//! }
//! ```
//!
//! # Rules only
//!
//! ```rust
//! use scamguard::{classify, ClassificationInput, RiskLevel};
//!
//! let result = classify(&ClassificationInput::text("Your OTP is 123456"));
//! assert_eq!(result.risk_level, RiskLevel::HighRisk);
//! ```

pub mod cache;
pub mod catalog;
pub mod classifier;
#[cfg(feature = "cli")]
pub mod config;
pub mod error;
pub mod gateway;
pub mod history;
pub mod providers;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheConfig, ResponseCache};
pub use catalog::Catalog;
pub use classifier::{RuleClassifier, classify};
pub use error::{Result, ScamGuardError};
pub use gateway::{Detector, ScamGuard, ScamGuardBuilder};
pub use history::{HistoryEntry, HistoryLog};
pub use providers::{AnalysisProvider, ProviderRegistry, RetryConfig, RuleBasedProvider};

#[cfg(feature = "google")]
pub use providers::{GeminiClient, GeminiConfig};

pub use types::{
    Analysis, AnalysisSource, Attachment, ClassificationInput, ClassificationResult, RiskLevel,
    Similarity,
};
