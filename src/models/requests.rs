//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::{MAX_KEY_LENGTH, MAX_VALUE_SIZE};

/// Request body for `PUT /cache/:key`
///
/// # Fields
/// - `value`: The value to store
/// - `ttl`: Optional TTL in seconds; must be positive when present
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The value to store
    pub value: String,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<i64>,
}

impl SetRequest {
    /// Checks boundary limits on the key and value.
    ///
    /// Returns an error message if validation fails, None if valid. TTL is
    /// validated by the engine.
    pub fn validate(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        if self.value.len() > MAX_VALUE_SIZE {
            return Some(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            ));
        }
        None
    }
}
