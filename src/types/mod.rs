//! Public types for the ScamGuard API.

mod analysis;
mod input;
mod verdict;

pub use analysis::{Analysis, AnalysisSource, now_millis};
pub use input::{Attachment, ClassificationInput};
pub use verdict::{ClassificationResult, RiskLevel, Similarity};
