//! Storefront Cache - A process-local tiered caching layer
//!
//! TTL caches with LRU eviction, grouped into tiers and fronted by smart
//! caches that resolve misses through caller-supplied factories.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod keys;
pub mod models;
pub mod monitor;
pub mod pool;
pub mod registry;
pub mod smart;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheConfig, CacheMetrics, TtlCache};
pub use config::Config;
pub use error::CacheError;
pub use pool::{CachePool, CacheProfile, CacheTier, SharedCache};
pub use registry::{CacheDomain, CacheRegistry};
pub use smart::{CacheResult, CacheStrategy, CachedValue, SmartCache};
pub use tasks::spawn_sweep_task;
