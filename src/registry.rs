//! Cache Registry
//!
//! Binds each application domain to a [`SmartCache`] over pool instances.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CacheError;
use crate::pool::{CachePool, CacheTier};
use crate::smart::SmartCache;

/// Application areas with their own smart cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheDomain {
    Homepage,
    Products,
    Pricing,
    Admin,
    Vendor,
    Analytics,
}

impl CacheDomain {
    pub const ALL: [CacheDomain; 6] = [
        CacheDomain::Homepage,
        CacheDomain::Products,
        CacheDomain::Pricing,
        CacheDomain::Admin,
        CacheDomain::Vendor,
        CacheDomain::Analytics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CacheDomain::Homepage => "homepage",
            CacheDomain::Products => "products",
            CacheDomain::Pricing => "pricing",
            CacheDomain::Admin => "admin",
            CacheDomain::Vendor => "vendor",
            CacheDomain::Analytics => "analytics",
        }
    }

    /// Primary tier and optional fallback tier of this domain.
    ///
    /// Analytics is expensive to compute but safe to serve stale, so it falls
    /// back to the long-lived static tier.
    pub fn tiers(self) -> (CacheTier, Option<CacheTier>) {
        match self {
            CacheDomain::Homepage => (CacheTier::Standard, None),
            CacheDomain::Products => (CacheTier::Standard, Some(CacheTier::Slow)),
            CacheDomain::Pricing => (CacheTier::Fast, None),
            CacheDomain::Admin => (CacheTier::Slow, None),
            CacheDomain::Vendor => (CacheTier::Standard, None),
            CacheDomain::Analytics => (CacheTier::Slow, Some(CacheTier::Static)),
        }
    }
}

impl fmt::Display for CacheDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheDomain {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheDomain::ALL
            .into_iter()
            .find(|domain| domain.as_str() == s)
            .ok_or_else(|| CacheError::UnknownDomain(s.to_string()))
    }
}

/// The smart caches of all domains, sharing one pool.
#[derive(Debug, Clone)]
pub struct CacheRegistry {
    pool: CachePool,
    homepage: SmartCache,
    products: SmartCache,
    pricing: SmartCache,
    admin: SmartCache,
    vendor: SmartCache,
    analytics: SmartCache,
}

impl CacheRegistry {
    pub fn new(pool: CachePool) -> Self {
        let build = |domain: CacheDomain| {
            let (primary, fallback) = domain.tiers();
            let primary = pool.get(primary).clone();
            match fallback {
                Some(tier) => SmartCache::with_fallback(primary, pool.get(tier).clone()),
                None => SmartCache::new(primary),
            }
        };

        Self {
            homepage: build(CacheDomain::Homepage),
            products: build(CacheDomain::Products),
            pricing: build(CacheDomain::Pricing),
            admin: build(CacheDomain::Admin),
            vendor: build(CacheDomain::Vendor),
            analytics: build(CacheDomain::Analytics),
            pool,
        }
    }

    pub fn pool(&self) -> &CachePool {
        &self.pool
    }

    pub fn get(&self, domain: CacheDomain) -> &SmartCache {
        match domain {
            CacheDomain::Homepage => &self.homepage,
            CacheDomain::Products => &self.products,
            CacheDomain::Pricing => &self.pricing,
            CacheDomain::Admin => &self.admin,
            CacheDomain::Vendor => &self.vendor,
            CacheDomain::Analytics => &self.analytics,
        }
    }

    /// Looks a domain up by its name.
    pub fn by_name(&self, name: &str) -> Result<&SmartCache, CacheError> {
        name.parse().map(|domain| self.get(domain))
    }
}
