//! Integration Tests for the Cache Registry
//!
//! Drives the domain smart caches end to end: key builders, strategies,
//! shared tiers and the pool lifecycle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use storefront_cache::{
    keys, monitor, CacheDomain, CachePool, CacheProfile, CacheRegistry, CacheStrategy, CacheTier,
};
use tokio_test::{assert_err, assert_ok};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DashboardSummary {
    orders: u32,
    revenue_cents: u64,
}

fn registry() -> CacheRegistry {
    CacheRegistry::new(CachePool::new())
}

/// A factory that counts its calls and returns the call number.
fn counting_factory(
    calls: &Arc<AtomicUsize>,
) -> impl FnOnce() -> std::future::Ready<Result<usize, String>> + Send + 'static {
    let calls = Arc::clone(calls);
    move || std::future::ready(Ok(calls.fetch_add(1, Ordering::SeqCst) + 1))
}

#[tokio::test]
async fn test_admin_dashboard_is_cached_by_key() {
    let registry = registry();
    let admin = registry.get(CacheDomain::Admin);
    let config = CacheProfile::Slow.config();
    let summary = DashboardSummary {
        orders: 12,
        revenue_cents: 99_00,
    };

    let key = keys::admin::dashboard("30d", false);
    let value = summary.clone();
    let first = assert_ok!(
        admin
            .get_or_set(
                &key,
                move || std::future::ready(Ok::<_, String>(value)),
                &config,
                CacheStrategy::CacheAside,
            )
            .await
    );
    assert!(!first.from_cache);

    let second = assert_ok!(
        admin
            .get_or_set(
                &key,
                || std::future::ready(Err::<DashboardSummary, _>("source down".to_string())),
                &config,
                CacheStrategy::CacheAside,
            )
            .await
    );
    assert!(second.from_cache);
    assert_eq!(second.data, summary);
    assert!(registry.pool().get(CacheTier::Slow).has(&key));
}

#[tokio::test]
async fn test_distinct_keys_do_not_share_entries() {
    let registry = registry();
    let vendor = registry.get(CacheDomain::Vendor);
    let config = CacheProfile::Fast.config();
    let calls = Arc::new(AtomicUsize::new(0));

    for vendor_id in [1, 2, 1] {
        let key = keys::vendor::dashboard(vendor_id, "7d");
        assert_ok!(
            vendor
                .get_or_set(&key, counting_factory(&calls), &config, CacheStrategy::CacheAside)
                .await
        );
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_factory_error_reaches_caller() {
    let registry = registry();
    let pricing = registry.get(CacheDomain::Pricing);
    let key = keys::public::product_detail("cellular");

    let result = pricing
        .get_or_set(
            &key,
            || std::future::ready(Err::<u32, _>("pricing service unavailable".to_string())),
            &CacheProfile::Realtime.config(),
            CacheStrategy::CacheFirst,
        )
        .await;

    assert_eq!(assert_err!(result), "pricing service unavailable");
    assert!(!pricing.primary().has(&key));
}

#[tokio::test(start_paused = true)]
async fn test_analytics_survives_primary_expiry_via_static_tier() {
    let registry = registry();
    let analytics = registry.get(CacheDomain::Analytics);
    let config = CacheProfile::Slow.config();
    let calls = Arc::new(AtomicUsize::new(0));
    let key = "analytics:revenue:2024";

    assert_ok!(
        analytics
            .get_or_set(key, counting_factory(&calls), &config, CacheStrategy::CacheFirst)
            .await
    );

    // Past the primary TTL but inside the doubled fallback TTL
    tokio::time::advance(Duration::from_secs(90 * 60)).await;

    let result = assert_ok!(
        analytics
            .get_or_set(key, counting_factory(&calls), &config, CacheStrategy::CacheFirst)
            .await
    );
    assert!(result.from_cache);
    assert_eq!(result.data, 1);
    assert_eq!(result.cache_age, Some(Duration::from_secs(90 * 60)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(registry.pool().get(CacheTier::Slow).has(key));
}

#[tokio::test]
async fn test_domains_sharing_a_tier_share_entries() {
    let registry = registry();
    let config = CacheProfile::Standard.config();
    let key = keys::public::homepage();

    assert_ok!(
        registry
            .get(CacheDomain::Homepage)
            .get_or_set(
                &key,
                || std::future::ready(Ok::<_, String>("hero".to_string())),
                &config,
                CacheStrategy::CacheAside,
            )
            .await
    );

    assert!(registry.get(CacheDomain::Vendor).primary().has(&key));
    assert!(registry.get(CacheDomain::Products).invalidate(&key));
    assert!(!registry.get(CacheDomain::Homepage).primary().has(&key));
}

#[tokio::test]
async fn test_monitor_sees_registry_traffic() {
    let registry = registry();
    let pricing = registry.get(CacheDomain::Pricing);
    let config = CacheProfile::Realtime.config();
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..4 {
        assert_ok!(
            pricing
                .get_or_set("price:sku-9", counting_factory(&calls), &config, CacheStrategy::CacheAside)
                .await
        );
    }

    let report = monitor::overall_stats(registry.pool());
    assert_eq!(report.overall.total_hits, 3);
    assert_eq!(report.overall.total_misses, 1);
    assert_eq!(report.overall.hit_rate_percent, 75);
    assert!(monitor::recommendations(registry.pool()).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_pool_sweeps_purge_expired_entries() {
    let pool = CachePool::new();
    let registry = CacheRegistry::new(pool.clone());
    pool.start_sweeps(Duration::from_secs(60));

    let short = CacheProfile::Realtime.config().with_ttl(Duration::from_secs(30));
    let pricing = registry.get(CacheDomain::Pricing);
    for sku in ["a", "b", "c"] {
        let key = format!("price:{sku}");
        assert_ok!(
            pricing
                .get_or_set(
                    &key,
                    || std::future::ready(Ok::<_, String>(100u32)),
                    &short,
                    CacheStrategy::CacheAside,
                )
                .await
        );
    }
    assert_eq!(pricing.primary().len(), 3);

    tokio::time::sleep(Duration::from_secs(61)).await;

    assert!(pricing.primary().is_empty());
    assert_eq!(pricing.primary().metrics().evictions, 3);

    pool.shutdown();
    for (_, cache) in pool.iter() {
        assert!(!cache.is_sweeping());
    }
}
