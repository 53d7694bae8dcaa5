//! Request DTOs for the admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Maximum accepted length of an invalidation pattern
pub const MAX_PATTERN_LENGTH: usize = 256;

/// Request body for pattern invalidation (POST /cache/:domain/invalidate)
///
/// # Fields
/// - `pattern`: Regular expression matched against cache keys
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidatePatternRequest {
    pub pattern: String,
}

impl InvalidatePatternRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.pattern.is_empty() {
            return Some("Pattern cannot be empty".to_string());
        }
        if self.pattern.len() > MAX_PATTERN_LENGTH {
            return Some(format!(
                "Pattern exceeds maximum length of {} characters",
                MAX_PATTERN_LENGTH
            ));
        }
        None
    }
}
