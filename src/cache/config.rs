//! Per-call cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fraction of the TTL after which refresh-ahead reads trigger a background refresh.
pub const DEFAULT_REFRESH_THRESHOLD: f64 = 0.8;

/// Settings supplied with every write.
///
/// `ttl` is required. `tags` defaults to empty and `refresh_threshold` to
/// [`DEFAULT_REFRESH_THRESHOLD`]. `max_size` and `auto_refresh` are carried
/// for callers that want to describe intent; the cache does not act on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry lifetime, serialized as milliseconds
    #[serde(with = "duration_ms")]
    pub ttl: Duration,
    #[serde(default, rename = "maxSize", skip_serializing_if = "Option::is_none")]
    pub max_size: Option<usize>,
    #[serde(default, rename = "autoRefresh")]
    pub auto_refresh: bool,
    #[serde(default = "default_refresh_threshold", rename = "refreshThreshold")]
    pub refresh_threshold: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_refresh_threshold() -> f64 {
    DEFAULT_REFRESH_THRESHOLD
}

impl CacheConfig {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            max_size: None,
            auto_refresh: false,
            refresh_threshold: DEFAULT_REFRESH_THRESHOLD,
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one tag on top of the existing ones.
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn with_refresh_threshold(mut self, threshold: f64) -> Self {
        self.refresh_threshold = threshold;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Age after which a refresh-ahead read schedules a background refresh.
    ///
    /// Non-finite or non-positive thresholds fall back to the default.
    pub fn refresh_after(&self) -> Duration {
        let threshold = if self.refresh_threshold.is_finite() && self.refresh_threshold > 0.0 {
            self.refresh_threshold
        } else {
            DEFAULT_REFRESH_THRESHOLD
        };
        let nanos = self.ttl.as_nanos() as f64 * threshold;
        if nanos >= u64::MAX as f64 {
            Duration::MAX
        } else {
            Duration::from_nanos(nanos as u64)
        }
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(ttl.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
