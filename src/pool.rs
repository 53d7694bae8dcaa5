//! Cache Instance Pool and Config Presets
//!
//! Four pre-sized cache instances for different data volatility classes, and
//! six TTL presets callers pick from instead of tuning every call site.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::cache::{CacheConfig, TtlCache};
use crate::config::Config;
use crate::smart::CachedValue;

/// Cache instance shared by the pool and the smart caches built on it.
pub type SharedCache = Arc<TtlCache<CachedValue>>;

// == Tiers ==
/// Capacity class of a pool instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheTier {
    /// Frequently accessed data
    Fast,
    /// Regular API responses
    Standard,
    /// Expensive operations
    Slow,
    /// Rarely changing data
    Static,
}

impl CacheTier {
    pub const ALL: [CacheTier; 4] = [
        CacheTier::Fast,
        CacheTier::Standard,
        CacheTier::Slow,
        CacheTier::Static,
    ];

    pub fn default_capacity(self) -> usize {
        match self {
            CacheTier::Fast => 500,
            CacheTier::Standard => 1000,
            CacheTier::Slow => 200,
            CacheTier::Static => 100,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CacheTier::Fast => "fast",
            CacheTier::Standard => "standard",
            CacheTier::Slow => "slow",
            CacheTier::Static => "static",
        }
    }
}

impl fmt::Display for CacheTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Profiles ==
/// TTL preset; each carries a default tag equal to its own name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheProfile {
    /// User sessions, cart contents
    Realtime,
    /// Prices, inventory
    Fast,
    /// Product lists, categories
    Standard,
    /// Analytics, reports
    Slow,
    /// Settings, configuration
    Static,
    /// Daily stats and summaries
    Daily,
}

impl CacheProfile {
    pub const ALL: [CacheProfile; 6] = [
        CacheProfile::Realtime,
        CacheProfile::Fast,
        CacheProfile::Standard,
        CacheProfile::Slow,
        CacheProfile::Static,
        CacheProfile::Daily,
    ];

    pub fn ttl(self) -> Duration {
        const MINUTE: u64 = 60;
        const HOUR: u64 = 60 * MINUTE;
        let secs = match self {
            CacheProfile::Realtime => 2 * MINUTE,
            CacheProfile::Fast => 5 * MINUTE,
            CacheProfile::Standard => 15 * MINUTE,
            CacheProfile::Slow => HOUR,
            CacheProfile::Static => 6 * HOUR,
            CacheProfile::Daily => 24 * HOUR,
        };
        Duration::from_secs(secs)
    }

    pub fn tag(self) -> &'static str {
        match self {
            CacheProfile::Realtime => "realtime",
            CacheProfile::Fast => "fast",
            CacheProfile::Standard => "standard",
            CacheProfile::Slow => "slow",
            CacheProfile::Static => "static",
            CacheProfile::Daily => "daily",
        }
    }

    /// A fresh config with this preset's TTL and tag.
    pub fn config(self) -> CacheConfig {
        CacheConfig::new(self.ttl()).with_tags([self.tag()])
    }
}

impl fmt::Display for CacheProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CacheProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheProfile::ALL
            .into_iter()
            .find(|profile| profile.tag() == s)
            .ok_or_else(|| format!("unknown cache profile '{s}'"))
    }
}

impl From<CacheProfile> for CacheConfig {
    fn from(profile: CacheProfile) -> Self {
        profile.config()
    }
}

// == Pool ==
/// The four tier instances, built once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct CachePool {
    fast: SharedCache,
    standard: SharedCache,
    slow: SharedCache,
    static_: SharedCache,
}

impl CachePool {
    /// Creates the pool with the default tier capacities (500/1000/200/100).
    pub fn new() -> Self {
        Self::with_capacities(|tier| tier.default_capacity())
    }

    /// Creates the pool with capacities taken from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_capacities(|tier| config.capacity(tier))
    }

    pub fn with_capacities(capacity: impl Fn(CacheTier) -> usize) -> Self {
        let build = |tier: CacheTier| Arc::new(TtlCache::named(tier.as_str(), capacity(tier)));
        Self {
            fast: build(CacheTier::Fast),
            standard: build(CacheTier::Standard),
            slow: build(CacheTier::Slow),
            static_: build(CacheTier::Static),
        }
    }

    pub fn get(&self, tier: CacheTier) -> &SharedCache {
        match tier {
            CacheTier::Fast => &self.fast,
            CacheTier::Standard => &self.standard,
            CacheTier::Slow => &self.slow,
            CacheTier::Static => &self.static_,
        }
    }

    /// Every tier paired with its instance, in tier order.
    pub fn iter(&self) -> impl Iterator<Item = (CacheTier, &SharedCache)> {
        CacheTier::ALL.into_iter().map(move |tier| (tier, self.get(tier)))
    }

    // == Lifecycle ==
    /// Starts the expiration sweep on every instance.
    pub fn start_sweeps(&self, interval: Duration) {
        for (_, cache) in self.iter() {
            cache.start_sweep(interval);
        }
        info!(interval_secs = interval.as_secs(), "Pool sweeps started");
    }

    pub fn stop_sweeps(&self) {
        for (_, cache) in self.iter() {
            cache.stop_sweep();
        }
    }

    /// Stops all sweeps and clears every instance.
    pub fn shutdown(&self) {
        for (_, cache) in self.iter() {
            cache.destroy();
        }
        info!("Cache pool shut down");
    }
}

impl Default for CachePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacities() {
        let pool = CachePool::new();
        assert_eq!(pool.get(CacheTier::Fast).max_size(), 500);
        assert_eq!(pool.get(CacheTier::Standard).max_size(), 1000);
        assert_eq!(pool.get(CacheTier::Slow).max_size(), 200);
        assert_eq!(pool.get(CacheTier::Static).max_size(), 100);
    }

    #[test]
    fn test_instance_names_match_tiers() {
        let pool = CachePool::new();
        for (tier, cache) in pool.iter() {
            assert_eq!(cache.name(), tier.as_str());
        }
    }

    #[test]
    fn test_profile_presets() {
        assert_eq!(CacheProfile::Realtime.ttl(), Duration::from_secs(120));
        assert_eq!(CacheProfile::Fast.ttl(), Duration::from_secs(300));
        assert_eq!(CacheProfile::Standard.ttl(), Duration::from_secs(900));
        assert_eq!(CacheProfile::Slow.ttl(), Duration::from_secs(3600));
        assert_eq!(CacheProfile::Static.ttl(), Duration::from_secs(6 * 3600));
        assert_eq!(CacheProfile::Daily.ttl(), Duration::from_secs(24 * 3600));
    }

    #[test]
    fn test_profile_config_carries_own_tag() {
        for profile in CacheProfile::ALL {
            let config = profile.config();
            assert_eq!(config.tags, vec![profile.tag().to_string()]);
            assert_eq!(config.ttl, profile.ttl());
        }
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!("daily".parse::<CacheProfile>(), Ok(CacheProfile::Daily));
        assert!("hourly".parse::<CacheProfile>().is_err());
    }

    #[test]
    fn test_pool_clones_share_instances() {
        let pool = CachePool::new();
        let clone = pool.clone();
        assert!(Arc::ptr_eq(pool.get(CacheTier::Fast), clone.get(CacheTier::Fast)));
    }

    #[tokio::test]
    async fn test_shutdown_stops_sweeps() {
        let pool = CachePool::new();
        pool.start_sweeps(Duration::from_secs(60));
        assert!(pool.iter().all(|(_, cache)| cache.is_sweeping()));

        pool.shutdown();
        assert!(pool.iter().all(|(_, cache)| !cache.is_sweeping()));
    }
}
