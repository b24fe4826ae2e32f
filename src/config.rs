//! Configuration Module
//!
//! Construction-time parameters for a cache instance.

use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// Capacity is fixed for the lifetime of the cache; the reclaim interval
/// controls how often the background task sweeps for expired entries.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of live entries the cache can hold
    pub capacity: usize,
    /// Interval between background reclamation sweeps
    pub reclaim_interval: Duration,
}

impl Config {
    /// Creates a configuration with the given capacity and the default
    /// one-second reclaim interval.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            reclaim_interval: Duration::from_secs(1),
        }
    }

    /// Sets the background reclaim interval.
    pub fn reclaim_interval(mut self, interval: Duration) -> Self {
        self.reclaim_interval = interval;
        self
    }

    /// Validates the configuration.
    ///
    /// A zero capacity is rejected: every `put` would have to evict the
    /// entry it is inserting.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::Config(
                "capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(1000)
    }
}
