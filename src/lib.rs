//! LRU TTL Cache - A bounded key-value cache server
//!
//! Provides LRU eviction and lazy TTL expiration behind an HTTP API, backed
//! either by process memory or by Redis.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::CacheEngine;
pub use config::{BackendKind, Config};
pub use error::{CacheError, Result};
