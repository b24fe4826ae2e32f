//! Cache Store Module
//!
//! Core cache engine combining HashMap storage with the recency list and
//! the expiry index. Single-threaded; the [`HybridCache`] façade wraps it
//! in a lock and supplies the clock.
//!
//! [`HybridCache`]: crate::cache::HybridCache

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;

use tracing::debug;

use crate::cache::entry::{expiry_at, CacheEntry};
use crate::cache::{CacheStats, ExpiryIndex, RecencyList};

// == Cache Store ==
/// Cache storage with LRU eviction and TTL expiration.
///
/// Invariant: the key set of `entries` and the key set of `recency` are
/// identical after every public method returns (each live key appears in
/// both, exactly once). The expiry index is exempt; it may hold stale
/// pairs for overwritten or removed keys.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage; owns the entries
    entries: HashMap<K, CacheEntry<V>>,
    /// Access ordering, least recently used at the front
    recency: RecencyList<K>,
    /// Pending expirations, earliest first
    expiry: ExpiryIndex<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of live entries
    capacity: usize,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore bounded at `capacity` live entries.
    ///
    /// Capacity must be non-zero; the façade validates this before
    /// construction.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            recency: RecencyList::with_capacity(capacity),
            expiry: ExpiryIndex::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
        }
    }

    // == Put ==
    /// Stores a key-value pair expiring `ttl_seconds` after `now`.
    ///
    /// An existing key has its value and expiry replaced and is promoted
    /// to most recently used; its old expiry pair is left in the index as
    /// a stale reference. A new key evicts the least-recently-used entry
    /// first if the cache is at capacity.
    ///
    /// A TTL of zero or less yields an entry that is already expired and
    /// will be removed by the next drain.
    pub fn put(&mut self, key: K, value: V, ttl_seconds: i64, now: Instant) {
        self.drain_expired(now);

        let expires_at = expiry_at(now, ttl_seconds);

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.value = value;
            entry.expires_at = expires_at;
            let idx = entry.recency;
            self.recency.move_to_back(idx);
        } else {
            if self.entries.len() >= self.capacity {
                self.evict_lru();
            }
            let idx = self.recency.push_back(key.clone());
            self.entries.insert(
                key.clone(),
                CacheEntry {
                    value,
                    expires_at,
                    recency: idx,
                },
            );
        }

        self.expiry.push(expires_at, key);
        self.stats.set_live_entries(self.entries.len());
        debug_assert_eq!(self.entries.len(), self.recency.len());
    }

    // == Get ==
    /// Retrieves a value by key, promoting it to most recently used.
    ///
    /// Due expirations are drained first, so a hit is always on a live
    /// entry. Returns `None` for absent or expired keys.
    pub fn get(&mut self, key: &K, now: Instant) -> Option<V> {
        self.drain_expired(now);

        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                let value = entry.value.clone();
                let idx = entry.recency;
                self.recency.move_to_back(idx);
                self.stats.record_hit();
                Some(value)
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Exists ==
    /// Checks whether a key is present and not expired.
    ///
    /// Best-effort probe against the entry's stored expiry: it neither
    /// updates the recency order nor drains the expiry index, so it is
    /// cheaper than `get` but reclaims no memory.
    pub fn exists(&self, key: &K, now: Instant) -> bool {
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired(now))
            .unwrap_or(false)
    }

    // == Remove ==
    /// Removes an entry by key, reporting whether a deletion occurred.
    ///
    /// The key's expiry pair stays in the index as a stale reference and
    /// is discarded by a later drain.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.recency.remove(entry.recency);
                self.stats.set_live_entries(self.entries.len());
                debug_assert_eq!(self.entries.len(), self.recency.len());
                true
            }
            None => false,
        }
    }

    // == Drain Expired ==
    /// Removes entries whose expiry is at or before `now`.
    ///
    /// Pops due pairs from the expiry index and deletes the matching entry
    /// only if the entry's *current* expiry is also due. The double-check
    /// is mandatory: a popped pair may be a stale leftover from an
    /// overwrite or removal, and deleting on the pop alone would evict a
    /// freshly refreshed entry.
    ///
    /// Returns the number of entries removed.
    pub fn drain_expired(&mut self, now: Instant) -> usize {
        let mut removed = 0;

        while let Some((_, key)) = self.expiry.pop_due(now) {
            let Some(entry) = self.entries.get(&key) else {
                continue;
            };
            if entry.is_expired(now) {
                let idx = entry.recency;
                self.entries.remove(&key);
                self.recency.remove(idx);
                self.stats.record_expiration();
                removed += 1;
            }
        }

        if removed > 0 {
            self.stats.set_live_entries(self.entries.len());
        }
        debug_assert_eq!(self.entries.len(), self.recency.len());
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_live_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries.
    ///
    /// O(1); may include expired entries that have not been reclaimed yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Evict LRU ==
    /// Removes the least-recently-used entry to make room for a new one.
    fn evict_lru(&mut self) {
        if let Some(key) = self.recency.pop_front() {
            self.entries.remove(&key);
            self.stats.record_eviction();
            debug!("Evicted least recently used entry under capacity pressure");
        }
    }

    // == Test Support ==
    /// Keys in recency order, least recently used first.
    #[cfg(test)]
    pub(crate) fn recency_keys(&self) -> Vec<K> {
        self.recency.iter().cloned().collect()
    }

    /// Keys currently in the entry table, in arbitrary order.
    #[cfg(test)]
    pub(crate) fn entry_keys(&self) -> Vec<K> {
        self.entries.keys().cloned().collect()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(base: Instant, secs: u64) -> Instant {
        base + Duration::from_secs(secs)
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<String, String> = CacheStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_put_and_get() {
        let base = Instant::now();
        let mut store = CacheStore::new(100);

        store.put("key1".to_string(), "value1".to_string(), 300, base);
        let value = store.get(&"key1".to_string(), at(base, 1));

        assert_eq!(value, Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let base = Instant::now();
        let mut store: CacheStore<String, String> = CacheStore::new(100);

        assert_eq!(store.get(&"nonexistent".to_string(), base), None);
    }

    #[test]
    fn test_store_overwrite() {
        let base = Instant::now();
        let mut store = CacheStore::new(100);

        store.put("key1".to_string(), "value1".to_string(), 300, base);
        store.put("key1".to_string(), "value2".to_string(), 300, at(base, 1));

        assert_eq!(
            store.get(&"key1".to_string(), at(base, 2)),
            Some("value2".to_string())
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_remove() {
        let base = Instant::now();
        let mut store = CacheStore::new(100);

        store.put("key1".to_string(), "value1".to_string(), 300, base);

        assert!(store.remove(&"key1".to_string()));
        assert!(store.is_empty());
        assert_eq!(store.get(&"key1".to_string(), at(base, 1)), None);
    }

    #[test]
    fn test_store_remove_is_idempotent() {
        let base = Instant::now();
        let mut store = CacheStore::new(100);

        store.put("key1".to_string(), "value1".to_string(), 300, base);

        assert!(store.remove(&"key1".to_string()));
        assert!(!store.remove(&"key1".to_string()));
        assert!(!store.remove(&"never_inserted".to_string()));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let base = Instant::now();
        let mut store = CacheStore::new(100);

        store.put("key1".to_string(), "value1".to_string(), 1, base);

        // Live strictly before insertion + ttl
        assert!(store.exists(&"key1".to_string(), base));

        // Absent at and after insertion + ttl
        assert_eq!(store.get(&"key1".to_string(), at(base, 2)), None);
        assert_eq!(store.len(), 0, "Expired entry should be drained by get");
    }

    #[test]
    fn test_store_zero_ttl_expires_immediately() {
        let base = Instant::now();
        let mut store = CacheStore::new(100);

        store.put("key1".to_string(), "value1".to_string(), 0, base);

        assert!(!store.exists(&"key1".to_string(), base));
        assert_eq!(store.get(&"key1".to_string(), base), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_negative_ttl_treated_as_zero() {
        let base = Instant::now();
        let mut store = CacheStore::new(100);

        store.put("key1".to_string(), "value1".to_string(), -10, base);

        assert!(!store.exists(&"key1".to_string(), base));
        assert_eq!(store.get(&"key1".to_string(), base), None);
    }

    #[test]
    fn test_store_lru_eviction() {
        let base = Instant::now();
        let mut store = CacheStore::new(2);

        store.put("a".to_string(), 1, 100, base);
        store.put("b".to_string(), 2, 100, at(base, 1));
        store.put("c".to_string(), 3, 100, at(base, 2));

        let now = at(base, 3);
        assert_eq!(store.len(), 2);
        assert!(!store.exists(&"a".to_string(), now));
        assert!(store.exists(&"b".to_string(), now));
        assert!(store.exists(&"c".to_string(), now));
    }

    #[test]
    fn test_store_get_promotes_recency() {
        let base = Instant::now();
        let mut store = CacheStore::new(2);

        store.put("a".to_string(), 1, 100, base);
        store.put("b".to_string(), 2, 100, at(base, 1));

        // Reading "a" makes "b" the eviction candidate
        store.get(&"a".to_string(), at(base, 2));
        store.put("c".to_string(), 3, 100, at(base, 3));

        let now = at(base, 4);
        assert!(store.exists(&"a".to_string(), now));
        assert!(!store.exists(&"b".to_string(), now));
        assert!(store.exists(&"c".to_string(), now));
    }

    #[test]
    fn test_store_overwrite_does_not_evict() {
        let base = Instant::now();
        let mut store = CacheStore::new(2);

        store.put("a".to_string(), 1, 100, base);
        store.put("b".to_string(), 2, 100, base);
        // Refreshing an existing key must not trigger eviction
        store.put("a".to_string(), 10, 100, at(base, 1));

        let now = at(base, 2);
        assert_eq!(store.len(), 2);
        assert!(store.exists(&"a".to_string(), now));
        assert!(store.exists(&"b".to_string(), now));
    }

    #[test]
    fn test_store_drain_skips_stale_pairs_after_refresh() {
        let base = Instant::now();
        let mut store = CacheStore::new(100);

        // Insert with a short TTL, then refresh with a long one; the old
        // expiry pair is now stale
        store.put("k".to_string(), 1, 1, base);
        store.put("k".to_string(), 2, 100, base);

        // The stale pair comes due, but the entry's current expiry has not
        let removed = store.drain_expired(at(base, 5));
        assert_eq!(removed, 0);
        assert_eq!(store.get(&"k".to_string(), at(base, 5)), Some(2));
    }

    #[test]
    fn test_store_drain_skips_stale_pairs_after_remove() {
        let base = Instant::now();
        let mut store = CacheStore::new(100);

        store.put("k".to_string(), 1, 1, base);
        store.remove(&"k".to_string());

        // The pair for the removed key is discarded without effect
        assert_eq!(store.drain_expired(at(base, 5)), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_drain_removes_due_entries() {
        let base = Instant::now();
        let mut store = CacheStore::new(100);

        store.put("short1".to_string(), 1, 1, base);
        store.put("short2".to_string(), 2, 2, base);
        store.put("long".to_string(), 3, 100, base);

        let removed = store.drain_expired(at(base, 3));
        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert!(store.exists(&"long".to_string(), at(base, 3)));
    }

    #[test]
    fn test_store_size_counts_unreclaimed_expired_entries() {
        let base = Instant::now();
        let mut store = CacheStore::new(100);

        store.put("k".to_string(), 1, 1, base);

        // len() is an O(1) count, not validated against expiry
        assert_eq!(store.len(), 1);
        assert!(!store.exists(&"k".to_string(), at(base, 2)));
        assert_eq!(store.len(), 1);

        store.drain_expired(at(base, 2));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_store_exists_does_not_promote() {
        let base = Instant::now();
        let mut store = CacheStore::new(2);

        store.put("a".to_string(), 1, 100, base);
        store.put("b".to_string(), 2, 100, at(base, 1));

        // exists() must not change the eviction order
        store.exists(&"a".to_string(), at(base, 2));
        store.put("c".to_string(), 3, 100, at(base, 3));

        assert!(!store.exists(&"a".to_string(), at(base, 4)));
        assert!(store.exists(&"b".to_string(), at(base, 4)));
    }

    #[test]
    fn test_store_eviction_prefers_draining_expired() {
        let base = Instant::now();
        let mut store = CacheStore::new(2);

        store.put("short".to_string(), 1, 1, base);
        store.put("long".to_string(), 2, 100, base);

        // "short" is due by now; the drain inside put frees its slot, so
        // no live entry needs to be evicted
        store.put("new".to_string(), 3, 100, at(base, 2));

        let now = at(base, 3);
        assert!(store.exists(&"long".to_string(), now));
        assert!(store.exists(&"new".to_string(), now));
        assert_eq!(store.stats().evictions, 0);
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_stats() {
        let base = Instant::now();
        let mut store = CacheStore::new(100);

        store.put("key1".to_string(), "value1".to_string(), 300, base);
        store.get(&"key1".to_string(), at(base, 1)); // hit
        store.get(&"missing".to_string(), at(base, 1)); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.live_entries, 1);
    }

    #[test]
    fn test_store_bijection_after_mixed_operations() {
        let base = Instant::now();
        let mut store = CacheStore::new(3);

        store.put("a".to_string(), 1, 1, base);
        store.put("b".to_string(), 2, 100, base);
        store.put("c".to_string(), 3, 100, at(base, 1));
        store.get(&"b".to_string(), at(base, 1));
        store.remove(&"c".to_string());
        store.put("d".to_string(), 4, 100, at(base, 2));
        store.put("e".to_string(), 5, 100, at(base, 2));
        store.drain_expired(at(base, 2));

        let mut table: Vec<String> = store.entry_keys();
        let mut order: Vec<String> = store.recency_keys();
        table.sort();
        order.sort();
        assert_eq!(table, order, "Entry table and recency list must agree");
    }
}
