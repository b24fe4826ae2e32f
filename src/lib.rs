//! Hybrid Cache - An in-memory cache combining TTL expiration with LRU eviction
//!
//! Entries carry a time-to-live and the cache holds at most a fixed number
//! of live entries; when capacity is exceeded the least recently used entry
//! is evicted. A per-instance background task reclaims expired entries.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheStats, HybridCache};
pub use config::Config;
pub use error::{CacheError, Result};
