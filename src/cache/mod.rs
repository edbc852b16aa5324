//! Cache Module
//!
//! Bounded key-value cache with LRU eviction and lazy TTL expiration, over
//! either an in-process store or Redis.

mod engine;
mod entry;
mod local;
mod recency;
#[cfg(feature = "redis")]
mod redis;
mod stats;
mod strategy;


// Re-export public types
pub use engine::{validate_ttl, CacheEngine};
pub use entry::CacheEntry;
pub use local::LocalStore;
pub use recency::{NodeId, RecencyIndex};
#[cfg(feature = "redis")]
pub use self::redis::{RedisOptions, RedisStore};
pub use stats::{CacheCounters, StatsReport};
pub use strategy::{ensure_capacity, Lookup, SetOutcome, StorageStrategy, TrackedKey};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
