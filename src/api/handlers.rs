//! API Handlers
//!
//! HTTP request handlers mapping the cache engine contract onto status codes.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::cache::CacheEngine;
use crate::error::{CacheError, Result};
use crate::models::{GetResponse, HealthResponse, SetRequest, SetResponse, StatsResponse};

/// Message returned when a key is absent or expired
pub const NOT_FOUND_MESSAGE: &str = "Cache key not found or TTL expired";

/// Application state shared across all handlers.
///
/// The engine serializes access internally, so it is shared without an
/// outer lock.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<CacheEngine>,
}

impl AppState {
    /// Creates a new AppState around an engine.
    pub fn new(engine: CacheEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.engine.get(&key).await? {
        Some(bytes) => Ok(Json(GetResponse::from_bytes(bytes))),
        None => Err(CacheError::NotFound(NOT_FOUND_MESSAGE.to_string())),
    }
}

/// Handler for PUT /cache/:key
///
/// Responds 201 when the key was created and 200 when it was updated.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<(StatusCode, Json<SetResponse>)> {
    if let Some(error_msg) = req.validate(&key) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let created = state.engine.set(&key, req.value, req.ttl).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(SetResponse::new(key, created))))
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode> {
    if state.engine.delete(&key).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CacheError::NotFound(format!("Cache key '{}' not found", key)))
    }
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let report = state.engine.stats().await?;
    Ok(Json(StatsResponse::from(report)))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.engine.backend_name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(capacity: usize) -> AppState {
        AppState::new(CacheEngine::local(capacity).unwrap())
    }

    fn set_request(value: &str, ttl: Option<i64>) -> Json<SetRequest> {
        Json(SetRequest {
            value: value.to_string(),
            ttl,
        })
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = state(3);

        let (status, Json(resp)) = set_handler(
            State(state.clone()),
            Path("test_key".to_string()),
            set_request("test_value", None),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert!(resp.created);

        let Json(resp) = get_handler(State(state), Path("test_key".to_string()))
            .await
            .unwrap();
        assert_eq!(resp.value, "test_value");
    }

    #[tokio::test]
    async fn test_update_returns_ok() {
        let state = state(3);
        let key = || Path("k".to_string());

        set_handler(State(state.clone()), key(), set_request("v1", None))
            .await
            .unwrap();
        let (status, _) = set_handler(State(state), key(), set_request("v2", Some(60)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let result = get_handler(State(state(3)), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(msg)) if msg == NOT_FOUND_MESSAGE));
    }

    #[tokio::test]
    async fn test_zero_ttl_is_bad_request() {
        let state = state(3);
        let result = set_handler(
            State(state.clone()),
            Path("k".to_string()),
            set_request("v", Some(0)),
        )
        .await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));

        let result = get_handler(State(state), Path("k".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = state(3);
        set_handler(
            State(state.clone()),
            Path("to_delete".to_string()),
            set_request("value", None),
        )
        .await
        .unwrap();

        let status = delete_handler(State(state.clone()), Path("to_delete".to_string()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let result = delete_handler(State(state), Path("to_delete".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = state(5);
        let Json(resp) = stats_handler(State(state)).await.unwrap();
        assert_eq!(resp.size, 0);
        assert_eq!(resp.capacity, 5);
        assert!(resp.items.is_empty());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let Json(resp) = health_handler(State(state(1))).await;
        assert_eq!(resp.status, "healthy");
        assert_eq!(resp.backend, "local");
    }
}
