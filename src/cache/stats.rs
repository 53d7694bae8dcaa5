//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, writes, deletes and evictions.

use std::time::Duration;

use serde::Serialize;

// == Cache Stats ==
/// Running counters kept by a single cache instance.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of completed writes
    pub sets: u64,
    /// Number of entries removed by explicit or bulk deletes
    pub deletes: u64,
    /// Number of entries removed by expiration sweeps or LRU pressure
    pub evictions: u64,
    /// Rolling hits / (hits + misses)
    pub hit_rate: f64,
    /// Rolling mean duration of timed operations, in milliseconds
    pub avg_response_time_ms: f64,
    timed_ops: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
        self.update_hit_rate();
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
        self.update_hit_rate();
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_deletes(&mut self, count: usize) {
        self.deletes += count as u64;
    }

    // == Record Eviction ==
    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    // == Response Time ==
    /// Folds one operation duration into the running mean.
    pub fn record_response_time(&mut self, elapsed: Duration) {
        self.timed_ops += 1;
        let sample = elapsed.as_secs_f64() * 1000.0;
        self.avg_response_time_ms += (sample - self.avg_response_time_ms) / self.timed_ops as f64;
    }

    fn update_hit_rate(&mut self) {
        let total = self.hits + self.misses;
        self.hit_rate = if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        };
    }

    // == Snapshot ==
    /// Combines the counters with the instance's current size figures.
    pub fn snapshot(&self, total_entries: usize, estimated_bytes: usize) -> CacheMetrics {
        CacheMetrics {
            hits: self.hits,
            misses: self.misses,
            sets: self.sets,
            deletes: self.deletes,
            evictions: self.evictions,
            avg_response_time_ms: self.avg_response_time_ms,
            hit_rate: self.hit_rate,
            total_entries,
            estimated_memory_mb: bytes_to_mb(estimated_bytes),
        }
    }
}

// == Cache Metrics ==
/// Point-in-time metrics of one cache instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub evictions: u64,
    pub avg_response_time_ms: f64,
    pub hit_rate: f64,
    pub total_entries: usize,
    #[serde(rename = "estimatedMemoryMB")]
    pub estimated_memory_mb: f64,
}

/// Megabytes rounded to two decimals.
pub fn bytes_to_mb(bytes: usize) -> f64 {
    round2(bytes as f64 / 1024.0 / 1024.0)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.sets, 0);
        assert_eq!(stats.deletes, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        assert_eq!(stats.hit_rate, 1.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate, 0.5);
    }

    #[test]
    fn test_bulk_counters() {
        let mut stats = CacheStats::new();
        stats.record_deletes(3);
        stats.record_evictions(2);
        stats.record_evictions(1);
        assert_eq!(stats.deletes, 3);
        assert_eq!(stats.evictions, 3);
    }

    #[test]
    fn test_average_response_time() {
        let mut stats = CacheStats::new();
        stats.record_response_time(Duration::from_millis(2));
        stats.record_response_time(Duration::from_millis(4));
        assert!((stats.avg_response_time_ms - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_memory_rounding() {
        let stats = CacheStats::new();
        let metrics = stats.snapshot(4, 1_572_864);
        assert_eq!(metrics.total_entries, 4);
        assert_eq!(metrics.estimated_memory_mb, 1.5);
    }

    #[test]
    fn test_metrics_serialize_camel_case() {
        let json = serde_json::to_string(&CacheMetrics::default()).unwrap();
        assert!(json.contains("hitRate"));
        assert!(json.contains("totalEntries"));
        assert!(json.contains("estimatedMemoryMB"));
    }
}
