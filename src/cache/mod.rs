//! Caching subsystem.
//!
//! - [`response::ResponseCache`]: opt-in LRU + TTL cache for upstream
//!   verdicts. Activated via the builder's `.response_cache()` method.

pub mod response;

pub use response::{CacheConfig, ResponseCache};
