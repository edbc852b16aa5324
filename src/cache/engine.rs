//! Cache Engine Module
//!
//! Serializes every operation through one async mutex around the storage
//! strategy and the lookup counters. The lock is held for the whole logical
//! operation, including backend round-trips, so no caller ever observes a
//! half-applied update. This is a throughput ceiling under contention; a
//! sharded lock would be needed to lift it.

use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::local::LocalStore;
use crate::cache::stats::{CacheCounters, StatsReport};
use crate::cache::strategy::{ensure_capacity, Lookup, StorageStrategy};
use crate::error::{CacheError, Result};

struct EngineState {
    backend: Box<dyn StorageStrategy>,
    counters: CacheCounters,
}

// == Cache Engine ==
/// Bounded key-value cache with TTL expiration over a pluggable backend.
///
/// Callers see the same contract regardless of backend, except for the
/// overflow behavior documented on [`StorageStrategy`].
pub struct CacheEngine {
    capacity: usize,
    backend_name: &'static str,
    /// TTL applied to writes that do not carry one
    default_ttl: Option<Duration>,
    state: Mutex<EngineState>,
}

impl CacheEngine {
    // == Constructors ==
    /// Wraps a storage strategy.
    ///
    /// Fails with a configuration error if the backend reports zero capacity.
    pub fn new(backend: Box<dyn StorageStrategy>) -> Result<Self> {
        let capacity = ensure_capacity(backend.capacity())?;
        Ok(Self {
            capacity,
            backend_name: backend.name(),
            default_ttl: None,
            state: Mutex::new(EngineState {
                backend,
                counters: CacheCounters::new(),
            }),
        })
    }

    /// Engine over an in-process [`LocalStore`].
    pub fn local(capacity: usize) -> Result<Self> {
        Self::new(Box::new(LocalStore::new(capacity)?))
    }

    /// Sets the TTL used when `set` is called without one.
    ///
    /// None (the default) means such entries never expire.
    pub fn with_default_ttl(mut self, default_ttl: Option<Duration>) -> Self {
        self.default_ttl = default_ttl;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend_name
    }

    // == Get ==
    /// Returns the live value for `key`, refreshing its recency.
    ///
    /// Unknown and expired keys both yield `Ok(None)`; an expired entry is
    /// purged as a side effect.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut state = self.state.lock().await;
        let lookup = state
            .backend
            .get(key)
            .await
            .inspect_err(|e| warn!(key, error = %e, "Backend get failed"))?;

        match &lookup {
            Lookup::Hit(_) => state.counters.record_hit(),
            Lookup::Miss => state.counters.record_miss(),
            Lookup::Expired => {
                debug!(key, "Purged expired entry");
                state.counters.record_expiration();
            }
        }
        Ok(lookup.into_value())
    }

    // == Set ==
    /// Inserts or replaces `key`, returning true if it was created.
    ///
    /// `ttl_secs` must be positive when given. A rejected TTL leaves the
    /// cache untouched.
    pub async fn set(
        &self,
        key: &str,
        value: impl Into<Vec<u8>>,
        ttl_secs: Option<i64>,
    ) -> Result<bool> {
        let ttl = validate_ttl(ttl_secs)?.or(self.default_ttl);
        let value = value.into();

        let mut state = self.state.lock().await;
        let outcome = state
            .backend
            .set(key, value, ttl)
            .await
            .inspect_err(|e| match e {
                CacheError::CapacityExceeded(_) => debug!(key, "Insert rejected: {}", e),
                _ => warn!(key, error = %e, "Backend set failed"),
            })?;

        if outcome.purged > 0 {
            debug!(key, purged = outcome.purged, "Dropped expired entries to make room");
            state.counters.record_purged(outcome.purged);
        }
        if let Some(evicted) = &outcome.evicted {
            debug!(key, evicted = %evicted, "Evicted least recently used entry");
            state.counters.record_eviction();
        }
        Ok(outcome.created)
    }

    // == Delete ==
    /// Removes `key`, returning whether anything was removed.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        state
            .backend
            .delete(key)
            .await
            .inspect_err(|e| warn!(key, error = %e, "Backend delete failed"))
    }

    // == Stats ==
    /// Reports size, capacity, ordered keys and lookup counters.
    pub async fn stats(&self) -> Result<StatsReport> {
        let mut state = self.state.lock().await;
        let listing = state
            .backend
            .enumerate()
            .await
            .inspect_err(|e| warn!(error = %e, "Backend enumerate failed"))?;

        Ok(StatsReport::from_listing(
            listing,
            self.capacity,
            &state.counters,
        ))
    }
}

// == TTL Validation ==
/// Converts a caller TTL in seconds, rejecting zero and negative values.
pub fn validate_ttl(ttl_secs: Option<i64>) -> Result<Option<Duration>> {
    match ttl_secs {
        None => Ok(None),
        Some(secs) if secs <= 0 => Err(CacheError::InvalidRequest(format!(
            "TTL must be a positive number of seconds, got {}",
            secs
        ))),
        Some(secs) => Ok(Some(Duration::from_secs(secs as u64))),
    }
}
