//! API Routes
//!
//! Configures the Axum router with the cache admin endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    domain_stats_handler, health_handler, invalidate_key_handler, invalidate_pattern_handler,
    invalidate_tag_handler, recommendations_handler, stats_handler, AppState,
};

/// Creates the admin router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /stats` - Pool-wide and per-tier metrics
/// - `GET /stats/recommendations` - Advisory tuning hints
/// - `GET /stats/:domain` - Metrics behind one domain's smart cache
/// - `DELETE /cache/:domain/key/:key` - Invalidate one key
/// - `DELETE /cache/:domain/tag/:tag` - Invalidate every entry carrying a tag
/// - `POST /cache/:domain/invalidate` - Invalidate keys matching a pattern
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // The static segment wins over the :domain capture
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/stats/recommendations", get(recommendations_handler))
        .route("/stats/:domain", get(domain_stats_handler))
        .route("/cache/:domain/key/:key", delete(invalidate_key_handler))
        .route("/cache/:domain/tag/:tag", delete(invalidate_tag_handler))
        .route("/cache/:domain/invalidate", post(invalidate_pattern_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::CachePool;
    use crate::registry::CacheRegistry;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let state = AppState::new(CacheRegistry::new(CachePool::new()));
        create_router(state)
    }

    async fn status_of(request: Request<Body>) -> StatusCode {
        create_test_app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let request = Request::builder().uri("/stats").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_recommendations_not_captured_as_domain() {
        let request = Request::builder()
            .uri("/stats/recommendations")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_domain() {
        let request = Request::builder()
            .uri("/stats/checkout")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalidate_missing_key() {
        let request = Request::builder()
            .method("DELETE")
            .uri("/cache/pricing/key/sku-1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalidate_bad_pattern() {
        let request = Request::builder()
            .method("POST")
            .uri("/cache/products/invalidate")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"pattern":"("}"#))
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
    }
}
