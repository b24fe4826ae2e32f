//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod expiry;
mod hybrid;
mod recency;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, MAX_TTL_SECONDS};
pub use expiry::ExpiryIndex;
pub use hybrid::HybridCache;
pub use recency::RecencyList;
pub use stats::CacheStats;
pub use store::CacheStore;
