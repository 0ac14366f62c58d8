//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_FAST_CAPACITY, DEFAULT_FAST_MAX_AGE, DEFAULT_REMOTE_TTL};
use crate::error::{CacheError, Result};
use crate::pagination::DEFAULT_MAX_SEQUENCES;

/// Which remote tier the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteBackend {
    Redis,
    Memory,
}

impl FromStr for RemoteBackend {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(RemoteBackend::Redis),
            "memory" => Ok(RemoteBackend::Memory),
            other => Err(CacheError::InvalidRequest(format!(
                "unknown remote backend '{other}'"
            ))),
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Fast-tier capacity in entries
    pub fast_capacity: usize,
    /// Fast-tier max-age, applied to every entry regardless of TTL
    pub fast_max_age: Duration,
    /// Remote TTL in seconds for writes without an explicit TTL
    pub default_ttl: u64,
    pub remote_backend: RemoteBackend,
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_db: i64,
    /// Remote connections opened at startup
    pub pool_min: usize,
    /// Maximum concurrent remote commands
    pub pool_max: usize,
    /// Wait limit for a free remote connection slot
    pub pool_acquire_timeout: Duration,
    /// Upper bound on any single remote operation
    pub remote_timeout: Duration,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
    /// Paginated sequences kept before the least recently used is dropped
    pub page_max_sequences: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `FAST_CAPACITY` (default: 30)
    /// - `FAST_MAX_AGE` seconds (default: 60)
    /// - `DEFAULT_TTL` seconds (default: 120)
    /// - `REMOTE_BACKEND` `redis` or `memory` (default: redis)
    /// - `REDIS_HOST`, `REDIS_PORT`, `REDIS_DB` (default: 127.0.0.1, 6379, 0)
    /// - `POOL_MIN`, `POOL_MAX` (default: 3, 10)
    /// - `POOL_ACQUIRE_TIMEOUT_MS` (default: 100)
    /// - `REMOTE_TIMEOUT_MS` (default: 250)
    /// - `SERVER_PORT` (default: 3000)
    /// - `CLEANUP_INTERVAL` seconds (default: 5)
    /// - `PAGE_MAX_SEQUENCES` (default: 256)
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            fast_capacity: env_or("FAST_CAPACITY", defaults.fast_capacity),
            fast_max_age: Duration::from_secs(env_or("FAST_MAX_AGE", DEFAULT_FAST_MAX_AGE)),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            remote_backend: env_or("REMOTE_BACKEND", defaults.remote_backend),
            redis_host: env::var("REDIS_HOST").unwrap_or(defaults.redis_host),
            redis_port: env_or("REDIS_PORT", defaults.redis_port),
            redis_db: env_or("REDIS_DB", defaults.redis_db),
            pool_min: env_or("POOL_MIN", defaults.pool_min),
            pool_max: env_or("POOL_MAX", defaults.pool_max),
            pool_acquire_timeout: Duration::from_millis(env_or("POOL_ACQUIRE_TIMEOUT_MS", 100)),
            remote_timeout: Duration::from_millis(env_or("REMOTE_TIMEOUT_MS", 250)),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            page_max_sequences: env_or("PAGE_MAX_SEQUENCES", defaults.page_max_sequences),
        }
    }

    /// Rejects settings the cache cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.fast_capacity == 0 {
            return Err(CacheError::InvalidRequest(
                "FAST_CAPACITY must be at least 1".to_string(),
            ));
        }
        if self.pool_max == 0 {
            return Err(CacheError::InvalidRequest(
                "POOL_MAX must be at least 1".to_string(),
            ));
        }
        if self.pool_min > self.pool_max {
            return Err(CacheError::InvalidRequest(format!(
                "POOL_MIN ({}) exceeds POOL_MAX ({})",
                self.pool_min, self.pool_max
            )));
        }
        if self.page_max_sequences == 0 {
            return Err(CacheError::InvalidRequest(
                "PAGE_MAX_SEQUENCES must be at least 1".to_string(),
            ));
        }
        if self.cleanup_interval == 0 {
            return Err(CacheError::InvalidRequest(
                "CLEANUP_INTERVAL must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fast_capacity: DEFAULT_FAST_CAPACITY,
            fast_max_age: Duration::from_secs(DEFAULT_FAST_MAX_AGE),
            default_ttl: DEFAULT_REMOTE_TTL,
            remote_backend: RemoteBackend::Redis,
            redis_host: "127.0.0.1".to_string(),
            redis_port: 6379,
            redis_db: 0,
            pool_min: 3,
            pool_max: 10,
            pool_acquire_timeout: Duration::from_millis(100),
            remote_timeout: Duration::from_millis(250),
            server_port: 3000,
            cleanup_interval: 5,
            page_max_sequences: DEFAULT_MAX_SEQUENCES,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.fast_capacity, 30);
        assert_eq!(config.fast_max_age, Duration::from_secs(60));
        assert_eq!(config.default_ttl, 120);
        assert_eq!(config.remote_backend, RemoteBackend::Redis);
        assert_eq!(config.pool_min, 3);
        assert_eq!(config.pool_max, 10);
        assert_eq!(config.pool_acquire_timeout, Duration::from_millis(100));
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.page_max_sequences, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_remote_backend_parse() {
        assert_eq!("redis".parse::<RemoteBackend>().unwrap(), RemoteBackend::Redis);
        assert_eq!(" Memory ".parse::<RemoteBackend>().unwrap(), RemoteBackend::Memory);
        assert!("memcached".parse::<RemoteBackend>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_pool() {
        let config = Config {
            pool_min: 11,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(CacheError::InvalidRequest(_))));

        let config = Config {
            pool_max: 0,
            pool_min: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = Config {
            fast_capacity: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
