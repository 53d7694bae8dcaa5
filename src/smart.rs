//! Strategy-driven read-through caching.
//!
//! [`SmartCache`] wraps a primary and an optional fallback [`TtlCache`] and
//! decides, per call, how a caller-supplied factory (the authoritative data
//! source) and the caches are combined. Values are stored as JSON inside a
//! [`CachedValue`] envelope so one pool instance can serve many payload types.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::{CacheConfig, CacheMetrics, TtlCache};
use crate::error::{CacheError, Result};
use crate::pool::SharedCache;

// == Strategy ==
/// How `get_or_set` combines the caches with the factory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStrategy {
    /// Primary only; on miss fetch and populate.
    #[default]
    CacheAside,
    /// Primary, then fallback, then fetch and populate both.
    CacheFirst,
    /// Serve from primary and refresh in the background once the entry ages
    /// past the configured threshold.
    RefreshAhead,
}

// == Envelope ==
/// What a smart cache actually stores: the payload and when it was fetched.
///
/// `stored_at` travels with the payload when it is copied between caches, so
/// a fallback backfill keeps reporting the original age.
#[derive(Debug, Clone, Serialize)]
pub struct CachedValue {
    pub data: serde_json::Value,
    #[serde(skip)]
    pub stored_at: Instant,
}

impl CachedValue {
    pub fn new(data: serde_json::Value) -> Self {
        Self {
            data,
            stored_at: Instant::now(),
        }
    }

    /// Serializes `data` into a fresh envelope, logging and returning `None` on failure.
    pub fn encode<T: Serialize>(key: &str, data: &T) -> Option<Self> {
        match serde_json::to_value(data) {
            Ok(value) => Some(Self::new(value)),
            Err(err) => {
                warn!(key = %key, error = %err, "Cache envelope serialization failed, not caching");
                None
            }
        }
    }

    /// Deserializes the payload, logging and returning `None` on a type mismatch.
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match T::deserialize(&self.data) {
            Ok(data) => Some(data),
            Err(err) => {
                warn!(key = %key, error = %err, "Cached value has unexpected shape, treating as miss");
                None
            }
        }
    }

    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.stored_at)
    }
}

// == Result ==
/// Outcome of a `get_or_set` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheResult<T> {
    pub data: T,
    pub from_cache: bool,
    /// Time since the served value was fetched; `None` for fresh fetches
    pub cache_age: Option<Duration>,
}

impl<T> CacheResult<T> {
    fn cached(data: T, age: Duration) -> Self {
        Self {
            data,
            from_cache: true,
            cache_age: Some(age),
        }
    }

    fn fresh(data: T) -> Self {
        Self {
            data,
            from_cache: false,
            cache_age: None,
        }
    }
}

/// Metrics of the caches behind one smart cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmartCacheMetrics {
    pub primary: CacheMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<CacheMetrics>,
}

// == Smart Cache ==
/// Read-through wrapper over a primary and an optional fallback cache.
///
/// Holds no entries of its own. There is no request coalescing: concurrent
/// misses on the same key each run their factory.
#[derive(Debug, Clone)]
pub struct SmartCache {
    primary: SharedCache,
    fallback: Option<SharedCache>,
}

impl SmartCache {
    pub fn new(primary: SharedCache) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(primary: SharedCache, fallback: SharedCache) -> Self {
        Self {
            primary,
            fallback: Some(fallback),
        }
    }

    pub fn primary(&self) -> &SharedCache {
        &self.primary
    }

    pub fn fallback(&self) -> Option<&SharedCache> {
        self.fallback.as_ref()
    }

    // == Get Or Set ==
    /// Returns the value for `key`, calling `factory` when the caches cannot.
    ///
    /// Factory errors are returned unchanged and nothing is cached for the
    /// key. The one exception is a refresh-ahead background refresh, whose
    /// failure is logged and dropped since the caller was already served.
    pub async fn get_or_set<T, E, F, Fut>(
        &self,
        key: &str,
        factory: F,
        config: &CacheConfig,
        strategy: CacheStrategy,
    ) -> std::result::Result<CacheResult<T>, E>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        E: Display + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    {
        match strategy {
            CacheStrategy::CacheAside => self.cache_aside(key, factory, config).await,
            CacheStrategy::CacheFirst => self.cache_first(key, factory, config).await,
            CacheStrategy::RefreshAhead => self.refresh_ahead(key, factory, config).await,
        }
    }

    async fn cache_aside<T, E, F, Fut>(
        &self,
        key: &str,
        factory: F,
        config: &CacheConfig,
    ) -> std::result::Result<CacheResult<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(hit) = read(&self.primary, key) {
            return Ok(hit);
        }

        let data = factory().await?;
        if let Some(envelope) = CachedValue::encode(key, &data) {
            self.primary.set(key, envelope, config);
        }
        Ok(CacheResult::fresh(data))
    }

    async fn cache_first<T, E, F, Fut>(
        &self,
        key: &str,
        factory: F,
        config: &CacheConfig,
    ) -> std::result::Result<CacheResult<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(hit) = read(&self.primary, key) {
            return Ok(hit);
        }

        if let Some(fallback) = &self.fallback {
            let hit = fallback.get_map(key, |envelope| {
                envelope.decode(key).map(|data| (data, envelope.clone()))
            });
            if let Some((data, envelope)) = hit {
                let age = envelope.age();
                debug!(key = %key, "Fallback hit, backfilling primary");
                self.primary.set(key, envelope, config);
                return Ok(CacheResult::cached(data, age));
            }
        }

        let data = factory().await?;
        if let Some(envelope) = CachedValue::encode(key, &data) {
            if let Some(fallback) = &self.fallback {
                let longer = config.clone().with_ttl(config.ttl.saturating_mul(2));
                fallback.set(key, envelope.clone(), &longer);
            }
            self.primary.set(key, envelope, config);
        }
        Ok(CacheResult::fresh(data))
    }

    async fn refresh_ahead<T, E, F, Fut>(
        &self,
        key: &str,
        factory: F,
        config: &CacheConfig,
    ) -> std::result::Result<CacheResult<T>, E>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        E: Display + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    {
        if let Some(hit) = read(&self.primary, key) {
            if hit.cache_age.is_some_and(|age| age > config.refresh_after()) {
                self.refresh_in_background(key.to_string(), factory, config.clone());
            }
            return Ok(hit);
        }

        let data = factory().await?;
        if let Some(envelope) = CachedValue::encode(key, &data) {
            self.primary.set(key, envelope, config);
        }
        Ok(CacheResult::fresh(data))
    }

    fn refresh_in_background<T, E, F, Fut>(&self, key: String, factory: F, config: CacheConfig)
    where
        T: Serialize + Send + 'static,
        E: Display + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    {
        let primary = Arc::clone(&self.primary);
        debug!(key = %key, "Scheduling background refresh");

        tokio::spawn(async move {
            match factory().await {
                Ok(data) => {
                    if let Some(envelope) = CachedValue::encode(&key, &data) {
                        primary.set(key.as_str(), envelope, &config);
                        debug!(key = %key, "Background refresh stored");
                    }
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "Background cache refresh failed");
                }
            }
        });
    }

    // == Invalidation ==
    /// Deletes `key` from both caches; true if either held it.
    pub fn invalidate(&self, key: &str) -> bool {
        self.invalidate_count(key) > 0
    }

    /// Deletes `key` from both caches; returns how many copies were removed.
    pub fn invalidate_count(&self, key: &str) -> usize {
        let primary = usize::from(self.primary.delete(key));
        let fallback = self
            .fallback
            .as_ref()
            .map_or(0, |fallback| usize::from(fallback.delete(key)));
        primary + fallback
    }

    /// Deletes every entry tagged `tag` from both caches; returns the combined count.
    pub fn invalidate_by_tag(&self, tag: &str) -> usize {
        let primary = self.primary.delete_by_tag(tag);
        let fallback = self
            .fallback
            .as_ref()
            .map_or(0, |fallback| fallback.delete_by_tag(tag));
        primary + fallback
    }

    /// Deletes every key matching the regular expression `pattern` from both caches.
    pub fn invalidate_by_pattern(&self, pattern: &str) -> Result<usize> {
        let regex =
            Regex::new(pattern).map_err(|err| CacheError::InvalidPattern(err.to_string()))?;
        let primary = self.primary.delete_by_pattern(&regex);
        let fallback = self
            .fallback
            .as_ref()
            .map_or(0, |fallback| fallback.delete_by_pattern(&regex));
        Ok(primary + fallback)
    }

    pub fn metrics(&self) -> SmartCacheMetrics {
        SmartCacheMetrics {
            primary: self.primary.metrics(),
            fallback: self.fallback.as_ref().map(|fallback| fallback.metrics()),
        }
    }
}

/// Envelope lookup that only counts a hit when the payload decodes into `T`.
fn read<T: DeserializeOwned>(cache: &TtlCache<CachedValue>, key: &str) -> Option<CacheResult<T>> {
    cache.get_map(key, |envelope| {
        envelope
            .decode(key)
            .map(|data| CacheResult::cached(data, envelope.age()))
    })
}
