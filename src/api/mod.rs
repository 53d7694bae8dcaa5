//! API Module
//!
//! HTTP handlers and routing for the cache admin surface. The caches are
//! populated in-process through `SmartCache`; this API only inspects and
//! invalidates them.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Pool-wide and per-tier metrics
//! - `GET /stats/recommendations` - Advisory tuning hints
//! - `GET /stats/:domain` - Metrics for one domain
//! - `DELETE /cache/:domain/key/:key` - Invalidate a key
//! - `DELETE /cache/:domain/tag/:tag` - Invalidate a tag
//! - `POST /cache/:domain/invalidate` - Invalidate by pattern

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
