//! Error types for the caching layer
//!
//! Provides unified error handling using thiserror. Factory errors passed
//! through `SmartCache::get_or_set` are never wrapped in this type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for cache administration.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No smart cache is registered under this domain name
    #[error("Unknown cache domain: {0}")]
    UnknownDomain(String),

    /// Invalidation pattern is not a valid regular expression
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Key not present in the addressed cache
    #[error("Key not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::UnknownDomain(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidPattern(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache administration.
pub type Result<T> = std::result::Result<T, CacheError>;
