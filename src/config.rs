//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

// == Backend Kind ==
/// Which storage strategy backs the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// In-process store with true LRU eviction
    Local,
    /// Redis, with TTL-approximated recency and no eviction
    Redis,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "memory" => Ok(BackendKind::Local),
            "redis" => Ok(BackendKind::Redis),
            other => Err(format!("unknown backend '{}'", other)),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Redis => write!(f, "redis"),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Storage strategy
    pub backend: BackendKind,
    /// TTL in seconds for writes without one; None = never expires.
    /// Also the window a Redis read extends an entry by.
    pub default_ttl: Option<u64>,
    /// Redis connection URL
    pub redis_url: String,
    /// Prefix for cache keys stored in Redis
    pub redis_prefix: String,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 5)
    /// - `CACHE_BACKEND` - `local` or `redis` (default: local)
    /// - `CACHE_DEFAULT_TTL` - Fallback TTL in seconds (default: unset)
    /// - `REDIS_URL` - Redis URL (default: redis://127.0.0.1:6379)
    /// - `REDIS_PREFIX` - Redis key prefix (default: cache:)
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// Unset or empty variables take their default; present but unparsable
    /// ones are a configuration error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            capacity: parse_or(&var, "CACHE_CAPACITY", defaults.capacity)?,
            backend: parse_or(&var, "CACHE_BACKEND", defaults.backend)?,
            default_ttl: match var("CACHE_DEFAULT_TTL") {
                Some(raw) => match parse_value("CACHE_DEFAULT_TTL", &raw)? {
                    0 => {
                        return Err(CacheError::Configuration(
                            "CACHE_DEFAULT_TTL must be positive".to_string(),
                        ))
                    }
                    secs => Some(secs),
                },
                None => defaults.default_ttl,
            },
            redis_url: var("REDIS_URL").unwrap_or(defaults.redis_url),
            redis_prefix: lookup("REDIS_PREFIX").unwrap_or(defaults.redis_prefix),
            server_port: parse_or(&var, "SERVER_PORT", defaults.server_port)?,
        })
    }

    /// Fallback TTL as a Duration.
    pub fn default_ttl(&self) -> Option<Duration> {
        self.default_ttl.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 5,
            backend: BackendKind::Local,
            default_ttl: None,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            redis_prefix: "cache:".to_string(),
            server_port: 8000,
        }
    }
}

fn parse_or<T, F>(var: &F, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| CacheError::Configuration(format!("{}={:?}: {}", name, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.capacity, 5);
        assert_eq!(config.backend, BackendKind::Local);
        assert_eq!(config.default_ttl, None);
        assert_eq!(config.server_port, 8000);
    }

    #[test]
    fn test_config_from_empty_lookup_uses_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.capacity, 5);
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.redis_prefix, "cache:");
        assert!(config.default_ttl().is_none());
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("CACHE_CAPACITY", "100"),
            ("CACHE_BACKEND", "Redis"),
            ("CACHE_DEFAULT_TTL", "3600"),
            ("REDIS_PREFIX", ""),
            ("SERVER_PORT", "9000"),
        ]))
        .unwrap();

        assert_eq!(config.capacity, 100);
        assert_eq!(config.backend, BackendKind::Redis);
        assert_eq!(config.default_ttl(), Some(Duration::from_secs(3600)));
        assert_eq!(config.redis_prefix, "");
        assert_eq!(config.server_port, 9000);
    }

    #[test]
    fn test_config_rejects_garbage() {
        for (name, raw) in [
            ("CACHE_CAPACITY", "-1"),
            ("CACHE_BACKEND", "memcached"),
            ("CACHE_DEFAULT_TTL", "soon"),
            ("CACHE_DEFAULT_TTL", "0"),
            ("SERVER_PORT", "70000"),
        ] {
            let result = Config::from_lookup(lookup_from(&[(name, raw)]));
            assert!(
                matches!(result, Err(CacheError::Configuration(_))),
                "{}={} should be rejected",
                name,
                raw
            );
        }
    }

    #[test]
    fn test_zero_capacity_loads() {
        // Rejected later, at engine construction
        let config = Config::from_lookup(lookup_from(&[("CACHE_CAPACITY", "0")])).unwrap();
        assert_eq!(config.capacity, 0);
    }
}
