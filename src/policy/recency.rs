//! Recency-based (LRU) eviction policy.

use std::hash::Hash;

use lru::LruCache;

use super::EvictionPolicy;

/// LRU eviction: the victim is the tracked key whose last access is oldest.
///
/// Keys are held in an unbounded [`lru::LruCache`] used purely as a
/// hash-indexed recency list — the owning tier enforces capacity, so the
/// policy itself never evicts on `track`. All operations are O(1).
pub struct RecencyPolicy<K: Hash + Eq> {
    order: LruCache<K, ()>,
}

impl<K: Hash + Eq> std::fmt::Debug for RecencyPolicy<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecencyPolicy")
            .field("len", &self.order.len())
            .finish()
    }
}

impl<K: Hash + Eq> Default for RecencyPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq> RecencyPolicy<K> {
    pub fn new() -> Self {
        Self {
            order: LruCache::unbounded(),
        }
    }
}

impl<K: Clone + Hash + Eq> EvictionPolicy<K> for RecencyPolicy<K> {
    fn track(&mut self, key: K) {
        // Re-tracking an existing key refreshes it to most-recently-used.
        self.order.put(key, ());
    }

    fn record_access(&mut self, key: &K) {
        // get() refreshes recency; absent keys are left untracked.
        let _ = self.order.get(key);
    }

    fn select_victim(&self) -> Option<K> {
        self.order.peek_lru().map(|(key, _)| key.clone())
    }

    fn evict(&mut self) -> Option<K> {
        self.order.pop_lru().map(|(key, _)| key)
    }

    fn remove(&mut self, key: &K) -> bool {
        self.order.pop(key).is_some()
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn keys(&self) -> Vec<K> {
        // iter() walks most-recent first; eviction order is the reverse.
        self.order.iter().rev().map(|(key, _)| key.clone()).collect()
    }
}
