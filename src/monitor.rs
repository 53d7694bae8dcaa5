//! Performance Monitor
//!
//! Aggregates metrics across the pool instances and emits advisory
//! recommendations. Nothing here tunes the caches.

use serde::Serialize;

use crate::cache::{round2, CacheMetrics};
use crate::pool::{CachePool, CacheTier};

/// Hit rate (percent) under which a longer TTL is suggested.
pub const LOW_HIT_RATE_PERCENT: u32 = 70;
/// Estimated footprint (MB) above which smaller caches are suggested.
pub const HIGH_MEMORY_MB: f64 = 100.0;
/// Entry count above which cache warming is suggested.
pub const HIGH_ENTRY_COUNT: usize = 5000;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    /// Rounded to a whole percent
    #[serde(rename = "hitRate")]
    pub hit_rate_percent: u32,
    pub total_entries: usize,
    #[serde(rename = "totalMemoryMB")]
    pub total_memory_mb: f64,
    pub total_hits: u64,
    pub total_misses: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierMetrics {
    pub tier: CacheTier,
    #[serde(flatten)]
    pub metrics: CacheMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub overall: OverallStats,
    pub individual: Vec<TierMetrics>,
}

/// Collects every tier's metrics and the pool-wide totals.
pub fn overall_stats(pool: &CachePool) -> PerformanceReport {
    let individual: Vec<TierMetrics> = pool
        .iter()
        .map(|(tier, cache)| TierMetrics {
            tier,
            metrics: cache.metrics(),
        })
        .collect();

    let total_hits: u64 = individual.iter().map(|t| t.metrics.hits).sum();
    let total_misses: u64 = individual.iter().map(|t| t.metrics.misses).sum();
    let total_entries = individual.iter().map(|t| t.metrics.total_entries).sum();
    let total_memory_mb: f64 = individual.iter().map(|t| t.metrics.estimated_memory_mb).sum();

    let lookups = total_hits + total_misses;
    let hit_rate = if lookups == 0 {
        0.0
    } else {
        total_hits as f64 / lookups as f64
    };

    PerformanceReport {
        overall: OverallStats {
            hit_rate_percent: (hit_rate * 100.0).round() as u32,
            total_entries,
            total_memory_mb: round2(total_memory_mb),
            total_hits,
            total_misses,
        },
        individual,
    }
}

/// Advisory tuning hints for the current pool state.
pub fn recommendations(pool: &CachePool) -> Vec<String> {
    recommendations_for(&overall_stats(pool).overall)
}

pub fn recommendations_for(stats: &OverallStats) -> Vec<String> {
    let mut recommendations = Vec::new();

    if stats.hit_rate_percent < LOW_HIT_RATE_PERCENT {
        recommendations.push("Consider increasing cache TTL for better hit rates".to_string());
    }
    if stats.total_memory_mb > HIGH_MEMORY_MB {
        recommendations.push("Memory usage is high, consider reducing cache sizes".to_string());
    }
    if stats.total_entries > HIGH_ENTRY_COUNT {
        recommendations
            .push("Large number of cache entries, consider implementing cache warming".to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::CacheProfile;
    use crate::smart::CachedValue;

    fn stats(hit_rate_percent: u32, total_entries: usize, total_memory_mb: f64) -> OverallStats {
        OverallStats {
            hit_rate_percent,
            total_entries,
            total_memory_mb,
            total_hits: 0,
            total_misses: 0,
        }
    }

    #[test]
    fn test_aggregates_across_tiers() {
        let pool = CachePool::new();
        let config = CacheProfile::Fast.config();
        let value = CachedValue::new(serde_json::json!("x"));

        pool.get(CacheTier::Fast).set("a", value.clone(), &config);
        pool.get(CacheTier::Slow).set("b", value, &config);
        pool.get(CacheTier::Fast).get("a");
        pool.get(CacheTier::Fast).get("a");
        pool.get(CacheTier::Slow).get("b");
        pool.get(CacheTier::Static).get("missing");

        let report = overall_stats(&pool);
        assert_eq!(report.overall.total_hits, 3);
        assert_eq!(report.overall.total_misses, 1);
        assert_eq!(report.overall.hit_rate_percent, 75);
        assert_eq!(report.overall.total_entries, 2);
        assert_eq!(report.individual.len(), 4);
        assert_eq!(report.individual[0].tier, CacheTier::Fast);
    }

    #[test]
    fn test_empty_pool_recommends_longer_ttl() {
        let pool = CachePool::new();

        assert_eq!(
            recommendations(&pool),
            vec!["Consider increasing cache TTL for better hit rates".to_string()]
        );
    }

    #[test]
    fn test_healthy_stats_have_no_recommendations() {
        assert!(recommendations_for(&stats(90, 100, 1.0)).is_empty());
    }

    #[test]
    fn test_all_thresholds() {
        let recommendations = recommendations_for(&stats(50, 6000, 150.0));
        assert_eq!(recommendations.len(), 3);
        assert!(recommendations[1].contains("Memory usage is high"));
        assert!(recommendations[2].contains("cache warming"));
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert!(recommendations_for(&stats(70, 5000, 100.0)).is_empty());
    }

    #[test]
    fn test_report_serializes_tier_inline() {
        let report = overall_stats(&CachePool::new());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["individual"][1]["tier"], "standard");
        assert!(json["individual"][1].get("hitRate").is_some());
        assert!(json["overall"].get("totalMemoryMB").is_some());
        assert_eq!(json["overall"]["hitRate"], 0);
    }
}
