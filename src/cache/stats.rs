//! Cache Statistics Module
//!
//! Lookup counters kept by the engine, and the aggregate report built from
//! a backend listing.

use crate::cache::strategy::TrackedKey;

// == Cache Counters ==
/// Running totals updated inside the engine's exclusive region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheCounters {
    /// Lookups that returned a live value
    pub hits: u64,
    /// Lookups that found nothing (including expired entries)
    pub misses: u64,
    /// Entries removed to make room for a new key
    pub evictions: u64,
    /// Entries discovered expired on lookup
    pub expirations: u64,
}

impl CacheCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// An expired entry counts as a miss too.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
        self.misses += 1;
    }

    /// Expired entries dropped on insert were never looked up, so no miss.
    pub fn record_purged(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Report ==
/// Snapshot of engine state taken under the exclusive region.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    /// Number of live entries
    pub size: usize,
    /// Configured maximum number of entries
    pub capacity: usize,
    /// Keys, most recently used first
    pub items: Vec<String>,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub hit_rate: f64,
}

impl StatsReport {
    /// Builds a report from an ordered listing.
    ///
    /// `size` is always the listing length, so it can never disagree with
    /// `items`.
    pub fn from_listing(listing: Vec<TrackedKey>, capacity: usize, counters: &CacheCounters) -> Self {
        let items: Vec<String> = listing.into_iter().map(|tracked| tracked.key).collect();
        Self {
            size: items.len(),
            capacity,
            items,
            hits: counters.hits,
            misses: counters.misses,
            evictions: counters.evictions,
            expirations: counters.expirations,
            hit_rate: counters.hit_rate(),
        }
    }
}
