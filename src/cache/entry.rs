//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single live cache entry.
///
/// Owned exclusively by the entry table. The `recency` field is a slab
/// index into the [`RecencyList`](crate::cache::RecencyList) arena, a
/// non-owning back-reference used for O(1) promotion and unlinking.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Instant at which the entry expires
    pub expires_at: Instant,
    /// Slab index of this key's node in the recency list
    pub recency: usize,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_seconds` after `now`.
    ///
    /// A TTL of zero means "already expired, removable on next drain".
    /// Negative TTLs are normalized to zero rather than rejected.
    pub fn new(value: V, now: Instant, ttl_seconds: i64, recency: usize) -> Self {
        Self {
            value,
            expires_at: expiry_at(now, ttl_seconds),
            recency,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches the
    /// expiration instant, so a TTL of `t` seconds makes the entry absent
    /// for all queries at insertion + `t` or later.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining TTL as of `now`, or zero if already expired.
    pub fn ttl_remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

// == Public Constants ==
/// Upper bound on a single entry's TTL (100 years), keeping expiry
/// arithmetic clear of `Instant` overflow.
pub const MAX_TTL_SECONDS: u64 = 100 * 365 * 24 * 60 * 60;

// == Utility Functions ==
/// Computes the expiration instant for a TTL relative to `now`.
///
/// Negative TTLs clamp to zero, yielding an entry that is expired
/// immediately; TTLs beyond [`MAX_TTL_SECONDS`] clamp down to it.
pub fn expiry_at(now: Instant, ttl_seconds: i64) -> Instant {
    let ttl = u64::try_from(ttl_seconds).unwrap_or(0);
    now + Duration::from_secs(ttl.min(MAX_TTL_SECONDS))
}
