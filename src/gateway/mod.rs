//! Detector construction and the analysis entry point

mod builder;
mod detector;

pub use builder::{ScamGuard, ScamGuardBuilder};
pub use detector::Detector;
