//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and access metadata.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// Insertion instant, immutable for the life of the entry
    pub created_at: Instant,
    /// Lifetime measured from `created_at`; never renewed on read
    pub ttl: Duration,
    /// Number of successful reads
    pub access_count: u64,
    /// Instant of the last successful read (or insertion)
    pub last_accessed: Instant,
    /// Monotonic sequence of the last touch, breaks `last_accessed` ties
    pub(crate) access_seq: u64,
    /// Labels for bulk invalidation
    pub tags: Vec<String>,
    /// Serialized length of the value, reporting only
    pub estimated_size_bytes: usize,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current instant.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Lifetime of the entry
    /// * `tags` - Invalidation labels
    /// * `estimated_size_bytes` - Size used for memory reporting
    pub fn new(value: T, ttl: Duration, tags: Vec<String>, estimated_size_bytes: usize) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            ttl,
            access_count: 0,
            last_accessed: now,
            access_seq: 0,
            tags,
            estimated_size_bytes,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once strictly more than `ttl` has elapsed since
    /// insertion; at exactly `ttl` it is still served.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a caller-supplied instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > self.ttl
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, `Duration::ZERO` once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.ttl_remaining_at(Instant::now())
    }

    /// A TTL reaching past the clock's range never runs out.
    pub fn ttl_remaining_at(&self, now: Instant) -> Duration {
        self.created_at
            .checked_add(self.ttl)
            .map_or(Duration::MAX, |end| end.saturating_duration_since(now))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    // == Touch ==
    /// Records a successful read.
    pub(crate) fn touch(&mut self, now: Instant, seq: u64) {
        self.access_count += 1;
        self.last_accessed = now;
        self.access_seq = seq;
    }
}
