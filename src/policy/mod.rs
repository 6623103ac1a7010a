//! Eviction policies for cache tiers.
//!
//! A policy tracks the keys resident in one tier and decides which key to
//! evict next. Two implementations are provided:
//!
//! - [`RecencyPolicy`] (LRU): evicts the least-recently-accessed key, O(1)
//! - [`FrequencyPolicy`] (LFU): evicts the key with the smallest access
//!   count, ties broken by insertion order, O(log n)
//!
//! Policies track keys only; values and capacity enforcement live in the
//! owning [`CacheTier`](crate::tier::CacheTier). Tracking begins only via an
//! explicit [`track`](EvictionPolicy::track) when the tier inserts a new
//! key; [`record_access`](EvictionPolicy::record_access) on an untracked key
//! is a safe no-op.

pub mod frequency;
pub mod recency;

pub use frequency::FrequencyPolicy;
pub use recency::RecencyPolicy;

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// The set of available eviction policies.
///
/// A closed enum rather than an open registry: tiers are configured with a
/// kind, and [`Policy`] dispatches over it. Adding a policy means adding a
/// variant here and an arm in [`Policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    /// Least-recently-used: evict the key whose last access is oldest
    Recency,
    /// Least-frequently-used: evict the key with the fewest recorded accesses
    Frequency,
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyKind::Recency => write!(f, "recency"),
            PolicyKind::Frequency => write!(f, "frequency"),
        }
    }
}

/// Contract shared by all eviction policies.
///
/// Invariant maintained by the owning tier: the policy's tracked key set
/// equals the tier map's key set at all times.
pub trait EvictionPolicy<K> {
    /// Begin tracking a newly inserted key.
    ///
    /// Tracking a key that is already tracked refreshes it as if accessed.
    fn track(&mut self, key: K);

    /// Register a read or write of `key`, updating ordering/frequency
    /// state. No-op when `key` is not tracked.
    fn record_access(&mut self, key: &K);

    /// The key that [`evict`](Self::evict) would remove next, without
    /// mutating state. `None` when nothing is tracked.
    fn select_victim(&self) -> Option<K>;

    /// Remove and return the next victim. `None` when nothing is tracked.
    fn evict(&mut self) -> Option<K>;

    /// Stop tracking `key`. Returns whether the key was tracked.
    fn remove(&mut self, key: &K) -> bool;

    /// Number of tracked keys.
    fn len(&self) -> usize;

    /// Whether no keys are tracked.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tracked keys in eviction order (next victim first). Diagnostic only.
    fn keys(&self) -> Vec<K>;
}

/// Closed polymorphic wrapper over the available policies.
#[derive(Debug)]
pub enum Policy<K: Hash + Eq> {
    Recency(RecencyPolicy<K>),
    Frequency(FrequencyPolicy<K>),
}

impl<K: Clone + Eq + Hash> Policy<K> {
    /// Construct a fresh policy of the given kind.
    pub fn new(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::Recency => Policy::Recency(RecencyPolicy::new()),
            PolicyKind::Frequency => Policy::Frequency(FrequencyPolicy::new()),
        }
    }

    /// The kind this policy was constructed with.
    pub fn kind(&self) -> PolicyKind {
        match self {
            Policy::Recency(_) => PolicyKind::Recency,
            Policy::Frequency(_) => PolicyKind::Frequency,
        }
    }
}

impl<K: Clone + Eq + Hash> EvictionPolicy<K> for Policy<K> {
    fn track(&mut self, key: K) {
        match self {
            Policy::Recency(p) => p.track(key),
            Policy::Frequency(p) => p.track(key),
        }
    }

    fn record_access(&mut self, key: &K) {
        match self {
            Policy::Recency(p) => p.record_access(key),
            Policy::Frequency(p) => p.record_access(key),
        }
    }

    fn select_victim(&self) -> Option<K> {
        match self {
            Policy::Recency(p) => p.select_victim(),
            Policy::Frequency(p) => p.select_victim(),
        }
    }

    fn evict(&mut self) -> Option<K> {
        match self {
            Policy::Recency(p) => p.evict(),
            Policy::Frequency(p) => p.evict(),
        }
    }

    fn remove(&mut self, key: &K) -> bool {
        match self {
            Policy::Recency(p) => p.remove(key),
            Policy::Frequency(p) => p.remove(key),
        }
    }

    fn len(&self) -> usize {
        match self {
            Policy::Recency(p) => p.len(),
            Policy::Frequency(p) => p.len(),
        }
    }

    fn keys(&self) -> Vec<K> {
        match self {
            Policy::Recency(p) => p.keys(),
            Policy::Frequency(p) => p.keys(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_kind_display() {
        assert_eq!(PolicyKind::Recency.to_string(), "recency");
        assert_eq!(PolicyKind::Frequency.to_string(), "frequency");
    }

    #[test]
    fn test_policy_dispatch() {
        let mut policy: Policy<&str> = Policy::new(PolicyKind::Recency);
        assert_eq!(policy.kind(), PolicyKind::Recency);
        assert!(policy.is_empty());

        policy.track("a");
        policy.track("b");
        policy.record_access(&"a");

        assert_eq!(policy.len(), 2);
        assert_eq!(policy.select_victim(), Some("b"));
        assert_eq!(policy.evict(), Some("b"));
        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn test_policy_kind_serde() {
        let json = serde_json::to_string(&PolicyKind::Frequency).unwrap();
        let parsed: PolicyKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, PolicyKind::Frequency);
    }
}
