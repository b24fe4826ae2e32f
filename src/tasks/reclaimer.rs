//! Background Reclaimer Task
//!
//! Periodic task that drains expired cache entries so that entries nobody
//! reads again are still reclaimed. Each cache instance owns its own
//! reclaimer; the task is signalled to stop and awaited when the cache is
//! closed, so no drain can run against a cache that is being torn down.

use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

// == Reclaimer Handle ==
/// Controls a running reclaimer task.
///
/// The task stops when [`shutdown`](ReclaimerHandle::shutdown) is called;
/// the stop signal is observed at the top of each iteration.
#[derive(Debug)]
pub struct ReclaimerHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReclaimerHandle {
    /// Signals the task to stop and waits for it to finish.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }

    /// Aborts the task without waiting. Fallback for teardown paths that
    /// cannot await.
    pub fn abort(&self) {
        self.task.abort();
    }
}

// == Spawn Reclaimer ==
/// Spawns a background task that periodically drains expired entries.
///
/// The task wakes every `interval`, takes the cache lock briefly, and runs
/// the same drain pass the read path uses. Must be called from within a
/// tokio runtime.
pub fn spawn_reclaimer<K, V>(
    store: Arc<Mutex<CacheStore<K, V>>>,
    interval: Duration,
) -> ReclaimerHandle
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    let (stop, mut stop_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!("Starting reclaimer task with interval {:?}", interval);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick of a tokio interval fires immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = stop_rx.changed() => break,
                _ = ticker.tick() => {
                    let removed = {
                        let mut store = store.lock().unwrap_or_else(PoisonError::into_inner);
                        store.drain_expired(Instant::now())
                    };
                    if removed > 0 {
                        info!("Reclaimer removed {} expired entries", removed);
                    } else {
                        debug!("Reclaimer found no expired entries");
                    }
                }
            }
        }

        debug!("Reclaimer task stopped");
    });

    ReclaimerHandle { stop, task }
}
