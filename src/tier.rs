//! A single capacity-bounded cache tier.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::policy::{EvictionPolicy, Policy, PolicyKind};

/// Counters for a single tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierStats {
    /// Lookups that found the key
    pub hits: u64,
    /// Lookups that did not
    pub misses: u64,
    /// Keys removed to make room for new ones
    pub evictions: u64,
}

/// Shared state guarded by the tier lock.
///
/// The map and the policy must always track the same key set; every
/// mutation path updates both under the one lock.
#[derive(Debug)]
struct TierInner<K: Hash + Eq, V> {
    data: HashMap<K, V>,
    policy: Policy<K>,
}

/// One bounded key-value store with its own eviction policy.
///
/// A tier never exceeds `capacity` keys: inserting a new key at capacity
/// first evicts exactly one victim chosen by the policy. Overwriting an
/// existing key never evicts. Reads mutate ordering/frequency state, so
/// `get` takes the same exclusive lock as `put` and `remove`.
#[derive(Debug)]
pub struct CacheTier<K: Hash + Eq, V> {
    capacity: usize,
    kind: PolicyKind,
    inner: Mutex<TierInner<K, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<K, V> CacheTier<K, V>
where
    K: Clone + Eq + Hash + Debug,
    V: Clone,
{
    /// Create a tier with a fixed capacity and policy kind.
    ///
    /// Fails with [`CacheError::InvalidConfiguration`] when `capacity` is 0.
    /// The tier is never resized after construction.
    pub fn new(capacity: usize, kind: PolicyKind) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::invalid_configuration(
                "tier capacity must be greater than 0",
            ));
        }

        Ok(Self {
            capacity,
            kind,
            inner: Mutex::new(TierInner {
                data: HashMap::with_capacity(capacity),
                policy: Policy::new(kind),
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        })
    }

    /// Membership test without touching access state.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().data.contains_key(key)
    }

    /// Look up `key`, recording the access on a hit. A miss has no side
    /// effect on membership.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        match inner.data.get(key).cloned() {
            Some(value) => {
                inner.policy.record_access(key);
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert or overwrite `key`.
    ///
    /// Overwrites record an access and never evict; capacity only matters
    /// for new keys. Inserting a new key at capacity evicts one victim
    /// chosen by the policy first.
    pub fn put(&self, key: K, value: V) -> Result<()> {
        let mut inner = self.inner.lock();

        if inner.data.contains_key(&key) {
            inner.policy.record_access(&key);
            inner.data.insert(key, value);
            return Ok(());
        }

        self.insert_new(&mut inner, key, value)
    }

    /// Insert `key` only if it is not already resident.
    ///
    /// Returns whether the insert happened. Used by promotion so that a
    /// value racing in through `put` is never overwritten with an older one.
    pub fn put_if_absent(&self, key: K, value: V) -> Result<bool> {
        let mut inner = self.inner.lock();

        if inner.data.contains_key(&key) {
            return Ok(false);
        }

        self.insert_new(&mut inner, key, value)?;
        Ok(true)
    }

    fn insert_new(&self, inner: &mut TierInner<K, V>, key: K, value: V) -> Result<()> {
        if inner.data.len() >= self.capacity {
            let victim = inner.policy.evict().ok_or_else(|| {
                CacheError::eviction_invariant(format!(
                    "tier holds {} keys but the {} policy tracks none",
                    inner.data.len(),
                    self.kind
                ))
            })?;
            if inner.data.remove(&victim).is_none() {
                return Err(CacheError::eviction_invariant(format!(
                    "policy victim {victim:?} is not resident in the tier"
                )));
            }
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(victim = ?victim, policy = %self.kind, "evicted key to make room");
        }

        inner.data.insert(key.clone(), value);
        inner.policy.track(key);
        Ok(())
    }

    /// Remove `key` from the map and from policy tracking.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        let value = inner.data.remove(key);
        let tracked = inner.policy.remove(key);
        debug_assert_eq!(value.is_some(), tracked);
        value
    }

    /// Current number of resident keys.
    pub fn len(&self) -> usize {
        self.inner.lock().data.len()
    }

    /// Whether the tier holds no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().data.is_empty()
    }

    /// Configured capacity bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The eviction policy this tier was built with.
    pub fn policy_kind(&self) -> PolicyKind {
        self.kind
    }

    /// Resident keys in eviction order (next victim first).
    pub fn keys(&self) -> Vec<K> {
        self.inner.lock().policy.keys()
    }

    /// Per-tier hit/miss/eviction counters.
    pub fn stats(&self) -> TierStats {
        TierStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}
