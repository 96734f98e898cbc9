//! Analysis providers.
//!
//! Upstream backends implement [`AnalysisProvider`]; the
//! [`ProviderRegistry`] chains them and falls back to the rule classifier.

pub mod decode;
#[cfg(feature = "google")]
pub mod google;
pub mod registry;
pub mod retry;
pub mod traits;

pub use decode::{decode_verdict, decode_verdict_with};
#[cfg(feature = "google")]
pub use google::{GeminiClient, GeminiConfig};
pub use registry::{FALLBACK_PROVIDER, ProviderRegistry};
pub use retry::{RetryConfig, RetryingProvider};
pub use traits::{AnalysisProvider, RuleBasedProvider};
