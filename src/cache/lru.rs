//! LRU Selection Module
//!
//! Picks batches of least recently used keys for eviction under capacity pressure.

use std::collections::HashMap;

use crate::cache::CacheEntry;

/// Share of capacity, in percent, freed by one LRU eviction pass.
pub const LRU_EVICTION_PERCENT: usize = 10;

// == Batch Size ==
/// Number of entries one LRU pass removes for a cache of `max_size`.
///
/// Always at least one, so small caches still make room.
pub fn eviction_batch_size(max_size: usize) -> usize {
    (max_size / (100 / LRU_EVICTION_PERCENT)).max(1)
}

// == Select Oldest ==
/// Returns up to `count` keys ordered from least to most recently accessed.
///
/// Entries are ranked by `last_accessed`, ties broken by access sequence.
pub fn least_recently_used<T>(entries: &HashMap<String, CacheEntry<T>>, count: usize) -> Vec<String> {
    if count == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(&String, &CacheEntry<T>)> = entries.iter().collect();
    ranked.sort_by(|(_, a), (_, b)| {
        a.last_accessed
            .cmp(&b.last_accessed)
            .then(a.access_seq.cmp(&b.access_seq))
    });

    ranked
        .into_iter()
        .take(count)
        .map(|(key, _)| key.clone())
        .collect()
}
