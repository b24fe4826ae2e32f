//! Hybrid Cache Façade
//!
//! The public, thread-safe cache type. All operations serialize on one
//! cache-wide mutex: the recency list and expiry index are shared
//! structures whose consistency spans the whole cache, so a coarse lock is
//! both simpler and sufficient. Lock hold times are bounded by O(log n)
//! index work plus the drain of currently-due entries.

use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::Result;
use crate::tasks::{spawn_reclaimer, ReclaimerHandle};

// == Hybrid Cache ==
/// Thread-safe in-memory cache with TTL expiration and LRU eviction.
///
/// Holds at most `capacity` live entries; inserting beyond capacity evicts
/// the least-recently-used entry. Every entry carries a TTL and expired
/// entries are reclaimed lazily on access and proactively by a
/// per-instance background task.
///
/// Construction spawns the background reclaimer, so a cache must be
/// created within a tokio runtime. Call [`close`](HybridCache::close) for
/// deterministic teardown; dropping without closing aborts the reclaimer
/// instead of awaiting it.
///
/// # Example
/// ```ignore
/// let cache: HybridCache<String, String> = HybridCache::new(100)?;
/// cache.put("k".to_string(), "v".to_string(), 60);
/// assert_eq!(cache.get(&"k".to_string()), Some("v".to_string()));
/// cache.close().await;
/// ```
#[derive(Debug)]
pub struct HybridCache<K, V> {
    /// Shared core, also held by the reclaimer task
    store: Arc<Mutex<CacheStore<K, V>>>,
    /// Background reclaimer; None once closed
    reclaimer: Option<ReclaimerHandle>,
}

impl<K, V> HybridCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    // == Constructor ==
    /// Creates a cache bounded at `capacity` live entries, with the
    /// default one-second reclaim interval.
    ///
    /// Fails with a configuration error if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(Config::new(capacity))
    }

    /// Creates a cache from an explicit configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let store = Arc::new(Mutex::new(CacheStore::new(config.capacity)));
        let reclaimer = spawn_reclaimer(Arc::clone(&store), config.reclaim_interval);
        Ok(Self {
            store,
            reclaimer: Some(reclaimer),
        })
    }

    // == Put ==
    /// Stores a key-value pair expiring after `ttl_seconds`.
    ///
    /// Overwriting an existing key refreshes its value, TTL and recency.
    /// A TTL of zero or less inserts an already-expired entry, removable
    /// on the next drain.
    pub fn put(&self, key: K, value: V, ttl_seconds: i64) {
        self.lock().put(key, value, ttl_seconds, Instant::now());
    }

    // == Get ==
    /// Retrieves a value by key, marking it most recently used.
    ///
    /// Returns `None` if the key is absent or expired. Due expirations are
    /// drained opportunistically before the lookup.
    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().get(key, Instant::now())
    }

    // == Exists ==
    /// Checks whether a key is present and not expired.
    ///
    /// Does not affect the recency order and does not drain the expiry
    /// index.
    pub fn exists(&self, key: &K) -> bool {
        self.lock().exists(key, Instant::now())
    }

    // == Remove ==
    /// Removes an entry by key, reporting whether a deletion occurred.
    pub fn remove(&self, key: &K) -> bool {
        self.lock().remove(key)
    }

    // == Length ==
    /// Returns the number of entries currently held.
    ///
    /// O(1); may include expired entries not yet reclaimed.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    // == Close ==
    /// Stops the background reclaimer and waits for it to finish.
    ///
    /// Consumes the cache; after close there is no background activity
    /// left.
    pub async fn close(mut self) {
        if let Some(reclaimer) = self.reclaimer.take() {
            reclaimer.shutdown().await;
        }
    }

    // == Lock ==
    /// Acquires the cache-wide lock.
    ///
    /// A poisoned lock is recovered rather than propagated: the store's
    /// methods keep it consistent even if a previous holder panicked
    /// mid-operation elsewhere.
    fn lock(&self) -> MutexGuard<'_, CacheStore<K, V>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> Drop for HybridCache<K, V> {
    fn drop(&mut self) {
        // close() already detached the reclaimer; otherwise stop it the
        // abrupt way so no task outlives the cache
        if let Some(reclaimer) = self.reclaimer.take() {
            reclaimer.abort();
        }
    }
}
