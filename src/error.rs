//! Error types for the lamina cache.

/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Main error type for the lamina cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Tier constructed with an unusable configuration (e.g. zero capacity).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// `remove_tier` called with a 1-based index outside `[1, tiers]`.
    #[error("Invalid tier index: {index} (valid range is 1..={tiers})")]
    InvalidTierIndex { index: usize, tiers: usize },

    /// The eviction policy and the key-value map disagree on the tracked
    /// key set. Signals an internal bug; callers should never observe it.
    #[error("Eviction invariant violated: {0}")]
    EvictionInvariantViolation(String),
}

impl CacheError {
    /// Create a new invalid configuration error
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a new invalid tier index error
    pub fn invalid_tier_index(index: usize, tiers: usize) -> Self {
        Self::InvalidTierIndex { index, tiers }
    }

    /// Create a new eviction invariant violation error
    pub fn eviction_invariant(msg: impl Into<String>) -> Self {
        Self::EvictionInvariantViolation(msg.into())
    }

    /// Check if this is a configuration error
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }

    /// Check if this is a tier index error
    pub fn is_invalid_tier_index(&self) -> bool {
        matches!(self, Self::InvalidTierIndex { .. })
    }
}
