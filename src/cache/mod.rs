//! Cache Module
//!
//! Bounded in-memory caching with TTL expiration, tag and pattern
//! invalidation, and batch LRU eviction.

mod config;
mod entry;
mod lru;
mod stats;
mod store;
mod ttl;


// Re-export public types
pub use config::{CacheConfig, DEFAULT_REFRESH_THRESHOLD};
pub use entry::CacheEntry;
pub use lru::{eviction_batch_size, LRU_EVICTION_PERCENT};
pub use stats::{bytes_to_mb, CacheMetrics, CacheStats};
pub use store::TtlStore;
pub use ttl::TtlCache;

pub(crate) use stats::round2;

// == Public Constants ==
/// Capacity used when none is given
pub const DEFAULT_CAPACITY: usize = 1000;

/// Size assumed for a value whose serialization fails
pub const DEFAULT_SIZE_ESTIMATE: usize = 1000;

/// Interval of the background expiration sweep
pub const DEFAULT_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(5 * 60);

/// Default look-ahead window for [`TtlCache::expiring_keys`]
pub const DEFAULT_EXPIRING_THRESHOLD: std::time::Duration = std::time::Duration::from_secs(60);
