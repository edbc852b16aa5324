//! Redis Store Module
//!
//! Networked storage strategy. Redis owns both the data and TTL enforcement;
//! recency is not tracked natively, so the store approximates LRU:
//! reads extend an entry's expiration window, and listings are ordered by
//! ascending remaining TTL.
//!
//! Unlike the local store this variant never evicts. An insert of a new key
//! while the store already holds `capacity` live keys fails with
//! [`CacheError::CapacityExceeded`].

use std::time::Duration;

use async_trait::async_trait;
use ::redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use tracing::debug;

use crate::cache::strategy::{ensure_capacity, Lookup, SetOutcome, StorageStrategy, TrackedKey};
use crate::error::{CacheError, Result};

// == Redis Options ==
/// Connection and sizing parameters for [`RedisStore`].
#[derive(Debug, Clone)]
pub struct RedisOptions {
    /// Redis connection URL (e.g. "redis://127.0.0.1:6379")
    pub url: String,
    /// Prefix applied to every cache key in Redis
    pub prefix: String,
    /// Maximum number of live keys under `prefix`
    pub capacity: usize,
    /// Expiration window re-applied on every successful read.
    /// None leaves the entry's current expiration untouched.
    pub refresh_ttl: Option<Duration>,
}

// == Redis Store ==
pub struct RedisStore {
    conn: MultiplexedConnection,
    prefix: String,
    capacity: usize,
    /// `EXPIRE` argument applied on reads
    refresh_secs: Option<i64>,
}

impl RedisStore {
    /// Opens a multiplexed connection to Redis.
    ///
    /// The prefix must be non-empty so capacity only counts this cache's
    /// keys, and the refresh window must fit an `EXPIRE` argument.
    pub async fn connect(options: RedisOptions) -> Result<Self> {
        let capacity = ensure_capacity(options.capacity)?;
        if options.prefix.is_empty() {
            return Err(CacheError::Configuration(
                "Redis key prefix must not be empty".to_string(),
            ));
        }
        let refresh_secs = options.refresh_ttl.map(expire_seconds).transpose()?;
        let client = Client::open(options.url.as_str())
            .map_err(|e| CacheError::Configuration(format!("Invalid Redis URL: {}", e)))?;
        let conn = client.get_multiplexed_async_connection().await?;

        debug!(url = %options.url, prefix = %options.prefix, "Connected to Redis");

        Ok(Self {
            conn,
            prefix: options.prefix,
            capacity,
            refresh_secs,
        })
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    async fn live_keys(&mut self) -> Result<Vec<String>> {
        let pattern = format!("{}*", escape_glob(&self.prefix));
        let keys: Vec<String> = self.conn.keys(pattern).await?;
        Ok(keys)
    }
}

#[async_trait]
impl StorageStrategy for RedisStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    async fn get(&mut self, key: &str) -> Result<Lookup> {
        let full = self.full_key(key);
        let value: Option<Vec<u8>> = self.conn.get(&full).await?;

        let Some(value) = value else {
            return Ok(Lookup::Miss);
        };

        if let Some(secs) = self.refresh_secs {
            let _: () = self.conn.expire(&full, secs).await?;
        }
        Ok(Lookup::Hit(value))
    }

    async fn set(
        &mut self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<SetOutcome> {
        let full = self.full_key(key);
        let exists: bool = self.conn.exists(&full).await?;

        if !exists {
            let live = self.live_keys().await?.len();
            if live >= self.capacity {
                return Err(CacheError::CapacityExceeded(format!(
                    "Cache holds {} of {} entries",
                    live, self.capacity
                )));
            }
        }

        match ttl {
            Some(ttl) => {
                let _: () = self.conn.set_ex(&full, value, whole_seconds(ttl)).await?;
            }
            None => {
                let _: () = self.conn.set(&full, value).await?;
            }
        }

        Ok(SetOutcome {
            created: !exists,
            evicted: None,
            purged: 0,
        })
    }

    async fn delete(&mut self, key: &str) -> Result<bool> {
        let full = self.full_key(key);
        let removed: i64 = self.conn.del(&full).await?;
        Ok(removed > 0)
    }

    async fn enumerate(&mut self) -> Result<Vec<TrackedKey>> {
        let keys = self.live_keys().await?;
        let mut tracked = Vec::with_capacity(keys.len());

        for full in keys {
            let pttl: i64 = self.conn.pttl(&full).await?;
            // Expired between KEYS and PTTL
            let Some(remaining) = remaining_from_pttl(pttl) else {
                continue;
            };
            let key = full
                .strip_prefix(self.prefix.as_str())
                .unwrap_or(full.as_str())
                .to_string();
            tracked.push(TrackedKey { key, remaining });
        }

        Ok(order_by_remaining(tracked))
    }
}

/// Redis expirations are whole seconds; round sub-second TTLs up.
fn whole_seconds(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs.max(1)
    }
}

/// Converts a refresh window into an `EXPIRE` argument.
///
/// A negative `EXPIRE` deletes the key, so windows past `i64::MAX` seconds
/// are refused rather than wrapped.
fn expire_seconds(window: Duration) -> Result<i64> {
    i64::try_from(whole_seconds(window)).map_err(|_| {
        CacheError::Configuration(format!(
            "Refresh window of {}s exceeds the Redis EXPIRE range",
            window.as_secs()
        ))
    })
}

/// Escapes `KEYS` glob metacharacters so the prefix matches literally.
fn escape_glob(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Maps a PTTL reply to a remaining lifetime.
///
/// -2 means the key is gone (outer None), -1 means it has no expiration.
fn remaining_from_pttl(pttl: i64) -> Option<Option<Duration>> {
    match pttl {
        -2 => None,
        ms if ms < 0 => Some(None),
        ms => Some(Some(Duration::from_millis(ms as u64))),
    }
}

/// Soonest-to-expire first; keys without expiration last. Ties break by key.
fn order_by_remaining(mut tracked: Vec<TrackedKey>) -> Vec<TrackedKey> {
    tracked.sort_by(|a, b| {
        let rank = |t: &TrackedKey| (t.remaining.is_none(), t.remaining);
        rank(a).cmp(&rank(b)).then_with(|| a.key.cmp(&b.key))
    });
    tracked
}
