//! Cache Store Module
//!
//! Single-owner cache engine combining HashMap storage with TTL expiration,
//! tag/pattern bulk deletion and batch LRU eviction. [`TtlCache`](crate::cache::TtlCache)
//! wraps it in a lock for shared use.

use std::collections::HashMap;
use std::io;
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::lru::{eviction_batch_size, least_recently_used};
use crate::cache::{CacheConfig, CacheEntry, CacheMetrics, CacheStats, DEFAULT_SIZE_ESTIMATE};

// == Cache Store ==
/// Bounded key-value storage with per-entry expiration.
#[derive(Debug)]
pub struct TtlStore<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of live entries
    max_size: usize,
    /// Monotonic counter stamped on every insert and hit
    access_seq: u64,
}

impl<T> TtlStore<T>
where
    T: Clone + Serialize,
{
    // == Constructor ==
    /// Creates an empty store holding at most `max_size` entries (at least one).
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_size: max_size.max(1),
            access_seq: 0,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    fn next_seq(&mut self) -> u64 {
        self.access_seq += 1;
        self.access_seq
    }

    // == Set ==
    /// Stores a value, overwriting any previous entry for `key`.
    ///
    /// Inserting a new key at capacity first purges expired entries, then
    /// evicts a batch of least recently used ones if the store is still full.
    /// Overwrites never trigger eviction.
    pub fn set(&mut self, key: String, value: T, config: &CacheConfig) {
        let started = Instant::now();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_size {
            self.make_room();
        }

        let size = estimate_size(&key, &value);
        let mut entry = CacheEntry::new(value, config.ttl, config.tags.clone(), size);
        entry.access_seq = self.next_seq();
        self.entries.insert(key, entry);

        self.stats.record_set();
        self.stats.record_response_time(started.elapsed());
    }

    fn make_room(&mut self) {
        let expired = self.purge_expired();
        if self.entries.len() < self.max_size {
            debug!(expired, "Capacity freed by expiration sweep");
            return;
        }

        let victims = least_recently_used(&self.entries, eviction_batch_size(self.max_size));
        for key in &victims {
            self.entries.remove(key);
        }
        self.stats.record_evictions(victims.len());
        debug!(expired, evicted = victims.len(), "Capacity freed by LRU eviction");
    }

    // == Get ==
    /// Returns the value if present and unexpired.
    ///
    /// Expired entries are removed. Every call counts as a hit or a miss.
    pub fn get(&mut self, key: &str) -> Option<T> {
        self.get_map(key, |value| Some(value.clone()))
    }

    /// Looks `key` up and maps the live value through `f`.
    ///
    /// Counts a hit, and refreshes recency, only when `f` returns `Some`; an
    /// absent, expired or rejected value counts as a miss.
    pub fn get_map<U, F>(&mut self, key: &str, f: F) -> Option<U>
    where
        F: FnOnce(&T) -> Option<U>,
    {
        let started = Instant::now();

        let mapped = match self.entries.get(key).map(|entry| entry.is_expired_at(started)) {
            None => None,
            Some(true) => {
                self.entries.remove(key);
                debug!(key = %key, "Expired entry removed on read");
                None
            }
            Some(false) => {
                let seq = self.next_seq();
                self.entries.get_mut(key).and_then(|entry| {
                    let mapped = f(&entry.value)?;
                    entry.touch(started, seq);
                    Some(mapped)
                })
            }
        };

        if mapped.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        self.stats.record_response_time(started.elapsed());

        mapped
    }

    // == Has ==
    /// Existence check with `get`'s expiration semantics; leaves statistics alone.
    pub fn has(&mut self, key: &str) -> bool {
        match self.entries.get(key).map(|entry| entry.is_expired()) {
            None => false,
            Some(true) => {
                self.entries.remove(key);
                false
            }
            Some(false) => true,
        }
    }

    // == Delete ==
    /// Removes an entry by key; true if it existed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.record_deletes(1);
        }
        removed
    }

    /// Removes every entry carrying `tag`, expired or not.
    pub fn delete_by_tag(&mut self, tag: &str) -> usize {
        self.remove_where(|_, entry| entry.has_tag(tag))
    }

    /// Removes every entry whose key matches `pattern`.
    pub fn delete_by_pattern(&mut self, pattern: &Regex) -> usize {
        self.remove_where(|key, _| pattern.is_match(key))
    }

    fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&str, &CacheEntry<T>) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|key, entry| !predicate(key, entry));
        let removed = before - self.entries.len();
        self.stats.record_deletes(removed);
        removed
    }

    // == Clear ==
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.record_deletes(removed);
    }

    // == Expiring Keys ==
    /// Keys whose remaining lifetime is positive and at most `threshold`.
    pub fn expiring_keys(&self, threshold: Duration) -> Vec<String> {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|(_, entry)| {
                let remaining = entry.ttl_remaining_at(now);
                !remaining.is_zero() && remaining <= threshold
            })
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, counting them as evictions.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - self.entries.len();
        self.stats.record_evictions(removed);
        removed
    }

    // == Metrics ==
    pub fn metrics(&self) -> CacheMetrics {
        let bytes = self
            .entries
            .values()
            .map(|entry| entry.estimated_size_bytes)
            .sum();
        self.stats.snapshot(self.entries.len(), bytes)
    }

    /// Returns the current number of entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only view of one entry's metadata.
    pub fn entry(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }
}

// == Size Estimation ==
/// Length of the JSON encoding of `value`, or [`DEFAULT_SIZE_ESTIMATE`] when it fails.
fn estimate_size<T: Serialize>(key: &str, value: &T) -> usize {
    let mut counter = ByteCounter(0);
    match serde_json::to_writer(&mut counter, value) {
        Ok(()) => counter.0,
        Err(err) => {
            warn!(key = %key, error = %err, "Cache size estimation failed, using default");
            DEFAULT_SIZE_ESTIMATE
        }
    }
}

struct ByteCounter(usize);

impl io::Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0 += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
