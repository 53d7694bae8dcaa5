//! API Handlers
//!
//! HTTP request handlers for the cache admin endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    HealthResponse, InvalidatePatternRequest, InvalidateResponse, RecommendationsResponse,
};
use crate::monitor::{self, PerformanceReport};
use crate::pool::CachePool;
use crate::registry::CacheRegistry;
use crate::smart::SmartCacheMetrics;

/// Application state shared across all handlers.
///
/// The registry is built once at startup; handlers only hold references.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CacheRegistry>,
}

impl AppState {
    /// Creates a new AppState around an existing registry.
    pub fn new(registry: CacheRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Sizes the pool tiers from the Config; sweeps are started by the caller.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheRegistry::new(CachePool::from_config(config)))
    }

    pub fn pool(&self) -> &CachePool {
        self.registry.pool()
    }
}

/// Handler for GET /stats
///
/// Returns pool-wide and per-tier metrics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<PerformanceReport> {
    Json(monitor::overall_stats(state.pool()))
}

/// Handler for GET /stats/recommendations
pub async fn recommendations_handler(State(state): State<AppState>) -> Json<RecommendationsResponse> {
    Json(RecommendationsResponse {
        recommendations: monitor::recommendations(state.pool()),
    })
}

/// Handler for GET /stats/:domain
///
/// Returns the primary and fallback metrics behind one domain.
pub async fn domain_stats_handler(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Result<Json<SmartCacheMetrics>> {
    let cache = state.registry.by_name(&domain)?;
    Ok(Json(cache.metrics()))
}

/// Handler for DELETE /cache/:domain/key/:key
pub async fn invalidate_key_handler(
    State(state): State<AppState>,
    Path((domain, key)): Path<(String, String)>,
) -> Result<Json<InvalidateResponse>> {
    let cache = state.registry.by_name(&domain)?;
    let removed = cache.invalidate_count(&key);
    if removed == 0 {
        return Err(CacheError::NotFound(key));
    }
    Ok(Json(InvalidateResponse::new(domain, removed)))
}

/// Handler for DELETE /cache/:domain/tag/:tag
pub async fn invalidate_tag_handler(
    State(state): State<AppState>,
    Path((domain, tag)): Path<(String, String)>,
) -> Result<Json<InvalidateResponse>> {
    let cache = state.registry.by_name(&domain)?;
    let removed = cache.invalidate_by_tag(&tag);
    Ok(Json(InvalidateResponse::new(domain, removed)))
}

/// Handler for POST /cache/:domain/invalidate
///
/// Removes every key matching the regular expression in the body.
pub async fn invalidate_pattern_handler(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Json(req): Json<InvalidatePatternRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidPattern(error_msg));
    }

    let cache = state.registry.by_name(&domain)?;
    let removed = cache.invalidate_by_pattern(&req.pattern)?;
    Ok(Json(InvalidateResponse::new(domain, removed)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
