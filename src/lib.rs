//! Multilevel key-value caching with pluggable eviction policies.
//!
//! `lamina` stacks independent cache tiers (tier 0 = fastest) behind one
//! logical get/put surface:
//!
//! - **Cascading lookup**: a `get` scans tiers top-to-bottom
//! - **Promotion**: a hit below tier 0 moves the entry up to tier 0
//! - **Per-tier eviction**: each tier enforces its own capacity with its
//!   own policy — recency-based (LRU) or frequency-based (LFU)
//!
//! There is no backing store: the bottom tier returns a miss and the caller
//! repopulates the cache with `put`. All operations are synchronous,
//! in-memory, and safe under concurrent access.
//!
//! # Examples
//!
//! ```
//! use lamina::{MultilevelCache, PolicyKind};
//!
//! let cache = MultilevelCache::new();
//! cache.add_tier(3, PolicyKind::Recency).unwrap();
//! cache.add_tier(2, PolicyKind::Frequency).unwrap();
//!
//! cache.put("a", 1).unwrap();
//! assert_eq!(cache.get(&"a").unwrap(), Some(1));
//! assert_eq!(cache.get(&"b").unwrap(), None); // miss: caller repopulates
//! ```

pub mod config;
pub mod error;
pub mod multilevel;
pub mod policy;
pub mod tier;

pub use config::{CacheConfig, TierConfig};
pub use error::{CacheError, Result};
pub use multilevel::{CacheStats, MultilevelCache, TierSnapshot};
pub use policy::{EvictionPolicy, FrequencyPolicy, Policy, PolicyKind, RecencyPolicy};
pub use tier::{CacheTier, TierStats};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{CacheConfig, TierConfig};
    pub use crate::error::{CacheError, Result};
    pub use crate::multilevel::{CacheStats, MultilevelCache, TierSnapshot};
    pub use crate::policy::{EvictionPolicy, PolicyKind};
    pub use crate::tier::CacheTier;
}
