//! Local Store Module
//!
//! In-process storage strategy: a HashMap of entries kept in lock-step with
//! a recency index, with lazy TTL checks on access.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::cache::recency::{NodeId, RecencyIndex};
use crate::cache::strategy::{ensure_capacity, Lookup, SetOutcome, StorageStrategy, TrackedKey};
use crate::cache::CacheEntry;
use crate::error::Result;

#[derive(Debug)]
struct Slot {
    entry: CacheEntry,
    node: NodeId,
}

// == Local Store ==
/// In-memory storage with LRU eviction and lazy TTL expiration.
///
/// Every key in `entries` owns exactly one node in `recency` and vice versa.
#[derive(Debug)]
pub struct LocalStore {
    entries: HashMap<String, Slot>,
    recency: RecencyIndex,
    capacity: usize,
}

impl LocalStore {
    // == Constructor ==
    /// Creates an empty store bounded to `capacity` entries.
    ///
    /// Fails with a configuration error when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = ensure_capacity(capacity)?;
        Ok(Self {
            entries: HashMap::with_capacity(capacity),
            recency: RecencyIndex::with_capacity(capacity),
            capacity,
        })
    }

    // == Lookup ==
    /// Reads a key, purging it if expired and refreshing it otherwise.
    pub fn lookup(&mut self, key: &str) -> Lookup {
        let Some(slot) = self.entries.get_mut(key) else {
            return Lookup::Miss;
        };

        if slot.entry.is_expired() {
            self.remove(key);
            return Lookup::Expired;
        }

        slot.entry.refresh();
        self.recency.touch(slot.node);
        Lookup::Hit(slot.entry.value.clone())
    }

    // == Insert ==
    /// Inserts or replaces a key.
    ///
    /// A new key arriving at capacity first drops any expired entries. Only
    /// if the store is still full does it evict exactly one live entry, the
    /// one at the back of the recency index.
    pub fn insert(&mut self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> SetOutcome {
        if let Some(slot) = self.entries.get_mut(key) {
            slot.entry.replace(value, ttl);
            self.recency.touch(slot.node);
            return SetOutcome {
                created: false,
                evicted: None,
                purged: 0,
            };
        }

        let mut purged = 0;
        if self.entries.len() >= self.capacity {
            purged = self.purge_expired();
        }
        let evicted = if self.entries.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        let node = self.recency.push_front(key.to_string());
        self.entries.insert(
            key.to_string(),
            Slot {
                entry: CacheEntry::new(value, ttl),
                node,
            },
        );

        SetOutcome {
            created: true,
            evicted,
            purged,
        }
    }

    // == Remove ==
    /// Removes a key from both structures.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(slot) => {
                self.recency.remove(slot.node);
                true
            }
            None => false,
        }
    }

    // == Listing ==
    /// Purges expired entries, then lists the rest most recently used first.
    pub fn listing(&mut self) -> Vec<TrackedKey> {
        self.purge_expired();

        self.recency
            .iter()
            .filter_map(|key| {
                self.entries.get(key).map(|slot| TrackedKey {
                    key: key.to_string(),
                    remaining: slot.entry.ttl_remaining(),
                })
            })
            .collect()
    }

    // == Purge Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, slot)| slot.entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }

    fn evict_oldest(&mut self) -> Option<String> {
        let key = self.recency.pop_back()?;
        self.entries.remove(&key);
        Some(key)
    }

    /// Keys from most to least recently used, without touching TTLs.
    pub fn keys(&self) -> Vec<String> {
        self.recency.iter().map(str::to_string).collect()
    }

    /// Number of tracked entries, including any not yet found expired.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl StorageStrategy for LocalStore {
    fn name(&self) -> &'static str {
        "local"
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    async fn get(&mut self, key: &str) -> Result<Lookup> {
        Ok(self.lookup(key))
    }

    async fn set(
        &mut self,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<SetOutcome> {
        Ok(self.insert(key, value, ttl))
    }

    async fn delete(&mut self, key: &str) -> Result<bool> {
        Ok(self.remove(key))
    }

    async fn enumerate(&mut self) -> Result<Vec<TrackedKey>> {
        Ok(self.listing())
    }
}
