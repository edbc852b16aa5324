//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache engine and its HTTP boundary.
///
/// A missing or expired key is not an error inside the engine; `NotFound`
/// only exists so the boundary layer can surface absence as a 404.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found (or lazily discovered expired)
    #[error("{0}")]
    NotFound(String),

    /// Caller-supplied input was rejected before any state changed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Networked store is at its configured maximum
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// Invalid construction parameters, fatal at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failure talking to the external store
    #[error("Backend error: {0}")]
    Backend(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Backend(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::CapacityExceeded(_) => StatusCode::CONFLICT,
            CacheError::Backend(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Configuration(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (CacheError::NotFound("key".to_string()), StatusCode::NOT_FOUND),
            (CacheError::InvalidRequest("bad".to_string()), StatusCode::BAD_REQUEST),
            (CacheError::CapacityExceeded("full".to_string()), StatusCode::CONFLICT),
            (CacheError::Backend("down".to_string()), StatusCode::SERVICE_UNAVAILABLE),
            (CacheError::Configuration("cap".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
            (CacheError::Internal("error".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[tokio::test]
    async fn test_not_found_body_is_bare_message() {
        let response =
            CacheError::NotFound("Cache key not found or TTL expired".to_string()).into_response();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "Cache key not found or TTL expired");
    }

    #[test]
    fn test_validation_message_is_prefixed() {
        let err = CacheError::InvalidRequest("TTL must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid request: TTL must be positive");
    }
}
