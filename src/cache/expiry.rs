//! Expiry Index Module
//!
//! Min-ordered priority structure of (expiry instant, key) pairs, used to
//! discover expired entries without scanning the whole entry table.
//!
//! The index uses lazy deletion: overwriting or removing a key leaves its
//! old pair in the heap as a stale reference. Stale pairs are filtered out
//! at drain time by re-checking the entry table's current expiry, which
//! keeps `put` at O(log n) instead of paying an O(n) heap scan per
//! overwrite.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Instant;

// == Deadline Pair ==
/// An (expiry instant, key) pair ordered by instant only.
#[derive(Debug)]
struct Deadline<K> {
    at: Instant,
    key: K,
}

impl<K> PartialEq for Deadline<K> {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at
    }
}

impl<K> Eq for Deadline<K> {}

impl<K> PartialOrd for Deadline<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for Deadline<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.at.cmp(&other.at)
    }
}

// == Expiry Index ==
/// Multiset of pending expirations, earliest first.
///
/// May contain multiple pairs for the same key and pairs for keys that no
/// longer exist; callers must validate popped pairs against the entry
/// table before acting on them.
#[derive(Debug, Default)]
pub struct ExpiryIndex<K> {
    heap: BinaryHeap<Reverse<Deadline<K>>>,
}

impl<K> ExpiryIndex<K> {
    // == Constructor ==
    /// Creates an empty index with room for `capacity` pairs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    // == Push ==
    /// Records that `key` expires at `at`.
    pub fn push(&mut self, at: Instant, key: K) {
        self.heap.push(Reverse(Deadline { at, key }));
    }

    // == Pop Due ==
    /// Removes and returns the earliest pair if its instant is at or
    /// before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<(Instant, K)> {
        let due = self
            .heap
            .peek()
            .map_or(false, |Reverse(deadline)| deadline.at <= now);
        if !due {
            return None;
        }
        let Reverse(deadline) = self.heap.pop()?;
        Some((deadline.at, deadline.key))
    }

    // == Length ==
    /// Number of pending pairs, stale ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
