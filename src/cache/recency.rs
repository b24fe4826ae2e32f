//! Recency List Module
//!
//! Doubly-linked ordering of live keys from least- to most-recently used,
//! backed by a stable-indexed arena instead of pointer links.
//!
//! Nodes live in a `Vec` of slots and link to each other by index, so the
//! entry table can hold a plain `usize` handle to a key's position. This
//! gives O(1) move-to-back and O(1) front eviction without storing
//! references into the list.

// == List Node ==
#[derive(Debug)]
struct Node<K> {
    key: K,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Arena-backed doubly-linked list of keys in access order.
///
/// Head = least recently used, tail = most recently used. Freed slots are
/// recycled through a free list so handles stay stable for live nodes.
#[derive(Debug, Default)]
pub struct RecencyList<K> {
    slots: Vec<Option<Node<K>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K> RecencyList<K> {
    // == Constructor ==
    /// Creates an empty recency list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Back ==
    /// Appends a key at the most-recently-used end and returns its handle.
    pub fn push_back(&mut self, key: K) -> usize {
        let node = Node {
            key,
            prev: self.tail,
            next: None,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        if let Some(tail) = self.tail {
            if let Some(tail_node) = self.slots[tail].as_mut() {
                tail_node.next = Some(idx);
            }
        } else {
            self.head = Some(idx);
        }
        self.tail = Some(idx);
        self.len += 1;
        idx
    }

    // == Remove ==
    /// Unlinks and frees the node at `idx`, returning its key.
    ///
    /// Returns `None` if the handle does not refer to a live node.
    pub fn remove(&mut self, idx: usize) -> Option<K> {
        self.detach(idx)?;
        let node = self.slots.get_mut(idx)?.take()?;
        self.free.push(idx);
        self.len -= 1;
        Some(node.key)
    }

    // == Move To Back ==
    /// Marks the node at `idx` as most recently used.
    pub fn move_to_back(&mut self, idx: usize) {
        if self.tail == Some(idx) {
            return;
        }
        if self.detach(idx).is_none() {
            return;
        }

        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = self.tail;
            node.next = None;
        }
        if let Some(tail) = self.tail {
            if let Some(tail_node) = self.slots[tail].as_mut() {
                tail_node.next = Some(idx);
            }
        } else {
            self.head = Some(idx);
        }
        self.tail = Some(idx);
    }

    // == Pop Front ==
    /// Removes and returns the least-recently-used key.
    ///
    /// Returns `None` if the list is empty.
    pub fn pop_front(&mut self) -> Option<K> {
        let head = self.head?;
        self.remove(head)
    }

    // == Peek Front ==
    /// Returns the least-recently-used key without removing it.
    pub fn front(&self) -> Option<&K> {
        let head = self.head?;
        self.slots.get(head)?.as_ref().map(|node| &node.key)
    }

    // == Length ==
    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iterate ==
    /// Walks the keys from least- to most-recently used.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let idx = cursor?;
            let node = self.slots.get(idx)?.as_ref()?;
            cursor = node.next;
            Some(&node.key)
        })
    }

    // == Detach ==
    /// Unlinks the node at `idx` from its neighbors without freeing it.
    fn detach(&mut self, idx: usize) -> Option<()> {
        let node = self.slots.get(idx)?.as_ref()?;
        let prev = node.prev;
        let next = node.next;

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = self.slots[prev_idx].as_mut() {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next_idx) => {
                if let Some(next_node) = self.slots[next_idx].as_mut() {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = None;
        }
        Some(())
    }
}
