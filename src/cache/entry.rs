//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored payload with its last-refresh instant and optional TTL.
///
/// Expiration is measured from the last successful read or write, not from
/// creation: every refresh restarts the TTL window.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Opaque payload
    pub value: Vec<u8>,
    /// Instant of creation or last successful read/write
    pub refreshed_at: Instant,
    /// Time to live, None = never expires
    pub ttl: Option<Duration>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry refreshed at the current instant.
    pub fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            value,
            refreshed_at: Instant::now(),
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived its TTL.
    ///
    /// Strictly greater-than: an entry whose elapsed time equals its TTL is
    /// still live.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Expiration check against an explicit instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.saturating_duration_since(self.refreshed_at) > ttl,
            None => false,
        }
    }

    // == Refresh ==
    /// Restarts the TTL window.
    pub fn refresh(&mut self) {
        self.refreshed_at = Instant::now();
    }

    // == Replace ==
    /// Replaces value and TTL, refreshing the timestamp.
    pub fn replace(&mut self, value: Vec<u8>, ttl: Option<Duration>) {
        self.value = value;
        self.ttl = ttl;
        self.refresh();
    }

    // == Time To Live ==
    /// Returns the remaining TTL, or None if the entry never expires.
    ///
    /// Saturates at zero once the entry has expired.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.ttl
            .map(|ttl| ttl.saturating_sub(self.refreshed_at.elapsed()))
    }
}
