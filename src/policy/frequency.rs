//! Frequency-based (LFU) eviction policy.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use super::EvictionPolicy;

#[derive(Debug, Clone, Copy)]
struct FreqEntry {
    count: u64,
    /// Insertion sequence number; the tie-break between equal counts.
    /// Assigned once at `track` and never changed by accesses, so ties
    /// always resolve oldest-inserted-first.
    seq: u64,
}

/// LFU eviction: the victim is the tracked key with the smallest access
/// count; ties resolve deterministically to the oldest-inserted key.
///
/// A newly tracked key starts at count 1 (insertion counts as the first
/// access). The ordered set keyed by `(count, seq)` acts as the priority
/// structure, so every operation is O(log n) without requiring `K: Ord`.
pub struct FrequencyPolicy<K: Hash + Eq> {
    entries: HashMap<K, FreqEntry>,
    heap: BTreeSet<(u64, u64)>,
    by_seq: HashMap<u64, K>,
    next_seq: u64,
}

impl<K: Hash + Eq> std::fmt::Debug for FrequencyPolicy<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrequencyPolicy")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<K: Hash + Eq> Default for FrequencyPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq> FrequencyPolicy<K> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            heap: BTreeSet::new(),
            by_seq: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Recorded access count for `key`, if tracked.
    pub fn count(&self, key: &K) -> Option<u64> {
        self.entries.get(key).map(|entry| entry.count)
    }
}

impl<K: Clone + Hash + Eq> EvictionPolicy<K> for FrequencyPolicy<K> {
    fn track(&mut self, key: K) {
        if self.entries.contains_key(&key) {
            self.record_access(&key);
            return;
        }

        let entry = FreqEntry {
            count: 1,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.heap.insert((entry.count, entry.seq));
        self.by_seq.insert(entry.seq, key.clone());
        self.entries.insert(key, entry);
    }

    fn record_access(&mut self, key: &K) {
        if let Some(entry) = self.entries.get_mut(key) {
            self.heap.remove(&(entry.count, entry.seq));
            entry.count += 1;
            self.heap.insert((entry.count, entry.seq));
        }
    }

    fn select_victim(&self) -> Option<K> {
        self.heap
            .first()
            .and_then(|(_, seq)| self.by_seq.get(seq).cloned())
    }

    fn evict(&mut self) -> Option<K> {
        let (count, seq) = self.heap.pop_first()?;
        debug_assert!(count >= 1);
        let key = self
            .by_seq
            .remove(&seq)
            .expect("heap entry without key index");
        self.entries.remove(&key);
        Some(key)
    }

    fn remove(&mut self, key: &K) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.heap.remove(&(entry.count, entry.seq));
                self.by_seq.remove(&entry.seq);
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn keys(&self) -> Vec<K> {
        self.heap
            .iter()
            .filter_map(|(_, seq)| self.by_seq.get(seq).cloned())
            .collect()
    }
}
