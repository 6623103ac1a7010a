//! Configuration for building a tier stack.

use serde::{Deserialize, Serialize};

use crate::policy::PolicyKind;

/// Configuration for a single cache tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Maximum number of resident keys (must be > 0)
    pub capacity: usize,
    /// Eviction policy for this tier
    pub policy: PolicyKind,
}

impl TierConfig {
    pub fn new(capacity: usize, policy: PolicyKind) -> Self {
        Self { capacity, policy }
    }
}

/// Configuration for the whole multilevel cache.
///
/// Tiers are ordered fastest-first: index 0 is the tier every `put` targets
/// and the tier hits get promoted into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Ordered tier stack (tier 0 = fastest)
    pub tiers: Vec<TierConfig>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            tiers: vec![
                TierConfig::new(1_000, PolicyKind::Recency), // hot data
                TierConfig::new(10_000, PolicyKind::Frequency), // warm data
            ],
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self { tiers: Vec::new() }
    }

    /// Append a tier at the bottom of the stack.
    pub fn tier(mut self, capacity: usize, policy: PolicyKind) -> Self {
        self.tiers.push(TierConfig::new(capacity, policy));
        self
    }
}
