//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::StatsReport;

/// Response body for `GET /cache/:key`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The stored value
    pub value: String,
}

impl GetResponse {
    /// Decodes a stored payload, replacing invalid UTF-8.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let value = match String::from_utf8(bytes) {
            Ok(value) => value,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        };
        Self { value }
    }
}

/// Response body for `PUT /cache/:key`
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// The key that was written
    pub key: String,
    /// True if the key did not exist before
    pub created: bool,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, created: bool) -> Self {
        Self {
            key: key.into(),
            created,
        }
    }
}

/// Response body for `GET /cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of live entries
    pub size: usize,
    /// Maximum number of entries
    pub capacity: usize,
    /// Keys, most recently used first
    pub items: Vec<String>,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<StatsReport> for StatsResponse {
    fn from(report: StatsReport) -> Self {
        Self {
            size: report.size,
            capacity: report.capacity,
            items: report.items,
            hits: report.hits,
            misses: report.misses,
            evictions: report.evictions,
            expirations: report.expirations,
            hit_rate: report.hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Active storage strategy
    pub backend: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(backend: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            backend: backend.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_response_serialize() {
        let resp = GetResponse::from_bytes(b"test_value".to_vec());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, serde_json::json!({ "value": "test_value" }));
    }

    #[test]
    fn test_get_response_lossy_bytes() {
        let resp = GetResponse::from_bytes(vec![b'o', b'k', 0xff]);
        assert!(resp.value.starts_with("ok"));
    }

    #[test]
    fn test_set_response_serialize() {
        let json = serde_json::to_value(SetResponse::new("my_key", true)).unwrap();
        assert_eq!(json["key"], "my_key");
        assert_eq!(json["created"], true);
    }

    #[test]
    fn test_stats_response_from_report() {
        let report = StatsReport {
            size: 1,
            capacity: 5,
            items: vec!["k".to_string()],
            hits: 4,
            misses: 1,
            evictions: 0,
            expirations: 1,
            hit_rate: 0.8,
        };
        let resp = StatsResponse::from(report);
        assert_eq!(resp.items, vec!["k"]);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy("local")).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("local"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let json = serde_json::to_string(&ErrorResponse::new("Something went wrong")).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
