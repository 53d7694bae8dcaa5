//! Configuration Module
//!
//! Loads server and pool settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_SWEEP_INTERVAL;
use crate::pool::CacheTier;

/// Server and cache pool configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP port of the admin server
    pub server_port: u16,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    pub fast_capacity: usize,
    pub standard_capacity: usize,
    pub slow_capacity: usize,
    pub static_capacity: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - Admin HTTP port (default: 3000)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 300)
    /// - `FAST_CAPACITY` - Entries in the fast tier (default: 500)
    /// - `STANDARD_CAPACITY` - Entries in the standard tier (default: 1000)
    /// - `SLOW_CAPACITY` - Entries in the slow tier (default: 200)
    /// - `STATIC_CAPACITY` - Entries in the static tier (default: 100)
    ///
    /// Missing, unparseable or zero values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from any variable source, with `from_env`'s fallbacks.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            server_port: parse_or(&lookup, "SERVER_PORT", defaults.server_port),
            sweep_interval: parse_or(&lookup, "SWEEP_INTERVAL", defaults.sweep_interval),
            fast_capacity: parse_or(&lookup, "FAST_CAPACITY", defaults.fast_capacity),
            standard_capacity: parse_or(&lookup, "STANDARD_CAPACITY", defaults.standard_capacity),
            slow_capacity: parse_or(&lookup, "SLOW_CAPACITY", defaults.slow_capacity),
            static_capacity: parse_or(&lookup, "STATIC_CAPACITY", defaults.static_capacity),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }

    pub fn capacity(&self, tier: CacheTier) -> usize {
        match tier {
            CacheTier::Fast => self.fast_capacity,
            CacheTier::Standard => self.standard_capacity,
            CacheTier::Slow => self.slow_capacity,
            CacheTier::Static => self.static_capacity,
        }
    }
}

fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> T
where
    T: FromStr + PartialEq + Default,
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .and_then(|v| v.trim().parse().ok())
        .filter(|v: &T| *v != T::default())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            sweep_interval: DEFAULT_SWEEP_INTERVAL.as_secs(),
            fast_capacity: CacheTier::Fast.default_capacity(),
            standard_capacity: CacheTier::Standard.default_capacity(),
            slow_capacity: CacheTier::Slow.default_capacity(),
            static_capacity: CacheTier::Static.default_capacity(),
        }
    }
}
