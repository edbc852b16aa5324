//! Storage Strategy Module
//!
//! The capability set every backend must provide so the engine can stay
//! agnostic of where entries live.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CacheError, Result};

// == Lookup Outcome ==
/// Result of a backend read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Live entry, recency already refreshed
    Hit(Vec<u8>),
    /// Key unknown
    Miss,
    /// Key was tracked but had expired; it has been purged
    Expired,
}

impl Lookup {
    pub fn into_value(self) -> Option<Vec<u8>> {
        match self {
            Lookup::Hit(value) => Some(value),
            Lookup::Miss | Lookup::Expired => None,
        }
    }
}

// == Set Outcome ==
/// Result of a backend write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOutcome {
    /// True if the key was previously absent
    pub created: bool,
    /// Key evicted to make room, if any
    pub evicted: Option<String>,
    /// Expired entries dropped to make room before any eviction
    pub purged: usize,
}

// == Tracked Key ==
/// A key as reported by enumeration, with its remaining lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedKey {
    pub key: String,
    /// None = never expires
    pub remaining: Option<Duration>,
}

// == Storage Strategy ==
/// Backend contract shared by the local and networked variants.
///
/// Every method takes `&mut self`: the engine owns the strategy behind its
/// single exclusive-access region, so implementations never see two calls
/// at once.
///
/// Eviction behavior deliberately differs between variants. The local
/// variant evicts the least recently used entry on overflow; the networked
/// variant rejects the insert with [`CacheError::CapacityExceeded`].
#[async_trait]
pub trait StorageStrategy: Send {
    /// Short backend name for logging
    fn name(&self) -> &'static str;

    /// Maximum number of live entries
    fn capacity(&self) -> usize;

    /// Reads a key, refreshing its recency on a hit.
    async fn get(&mut self, key: &str) -> Result<Lookup>;

    /// Inserts or replaces a key. `ttl` is already validated.
    async fn set(&mut self, key: &str, value: Vec<u8>, ttl: Option<Duration>)
        -> Result<SetOutcome>;

    /// Removes a key, returning whether it was present.
    async fn delete(&mut self, key: &str) -> Result<bool>;

    /// Lists live keys in the backend's best approximation of
    /// most-recently-used-first order.
    async fn enumerate(&mut self) -> Result<Vec<TrackedKey>>;
}

// == Capacity Validation ==
/// Rejects a zero capacity with a configuration error.
pub fn ensure_capacity(capacity: usize) -> Result<usize> {
    if capacity == 0 {
        return Err(CacheError::Configuration(
            "Capacity must be greater than 0".to_string(),
        ));
    }
    Ok(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_capacity() {
        assert_eq!(ensure_capacity(3).unwrap(), 3);
        assert!(matches!(
            ensure_capacity(0),
            Err(CacheError::Configuration(_))
        ));
    }

    #[test]
    fn test_lookup_into_value() {
        assert_eq!(Lookup::Hit(b"v".to_vec()).into_value(), Some(b"v".to_vec()));
        assert_eq!(Lookup::Miss.into_value(), None);
        assert_eq!(Lookup::Expired.into_value(), None);
    }
}
