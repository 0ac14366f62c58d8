//! Redis remote tier.
//!
//! A fixed set of multiplexed connections shared round-robin, with a semaphore
//! bounding in-flight commands and a timeout on acquiring a slot.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ::redis::aio::MultiplexedConnection;
use ::redis::{AsyncCommands, Client};
use async_trait::async_trait;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::info;

use crate::cache::RemoteStore;
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Redis Config ==
/// Connection and pool settings for [`RedisRemote`].
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub db: i64,
    /// Connections opened at startup
    pub pool_min: usize,
    /// Maximum concurrent commands
    pub pool_max: usize,
    /// How long a command waits for a free slot
    pub acquire_timeout: Duration,
}

impl RedisConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.redis_host.clone(),
            port: config.redis_port,
            db: config.redis_db,
            pool_min: config.pool_min,
            pool_max: config.pool_max,
            acquire_timeout: config.pool_acquire_timeout,
        }
    }

    /// `redis://host:port/db`
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

// == Redis Remote ==
pub struct RedisRemote {
    connections: Vec<MultiplexedConnection>,
    next: AtomicUsize,
    slots: Semaphore,
    acquire_timeout: Duration,
}

impl RedisRemote {
    // == Connect ==
    /// Opens `pool_min` connections (at least one) to the configured server.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = Client::open(config.url())?;
        let pool_max = config.pool_max.max(1);
        let opened = config.pool_min.clamp(1, pool_max);

        let mut connections = Vec::with_capacity(opened);
        for _ in 0..opened {
            connections.push(client.get_multiplexed_async_connection().await?);
        }

        info!(
            url = %config.url(),
            connections = opened,
            pool_max,
            "Connected to Redis remote tier"
        );

        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
            slots: Semaphore::new(pool_max),
            acquire_timeout: config.acquire_timeout,
        })
    }

    // == Checkout ==
    /// Waits for a command slot and picks the next connection.
    async fn checkout(&self) -> Result<(SemaphorePermit<'_>, MultiplexedConnection)> {
        let permit = tokio::time::timeout(self.acquire_timeout, self.slots.acquire())
            .await
            .map_err(|_| {
                CacheError::Timeout(format!(
                    "no Redis connection available within {:?}",
                    self.acquire_timeout
                ))
            })?
            .map_err(|e| CacheError::Internal(e.to_string()))?;

        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        Ok((permit, self.connections[index].clone()))
    }
}

#[async_trait]
impl RemoteStore for RedisRemote {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let (_permit, mut conn) = self.checkout().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        let (_permit, mut conn) = self.checkout().await?;
        let _: () = conn.set_ex(key, value, ttl_seconds.max(1)).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let (_permit, mut conn) = self.checkout().await?;
        let _: i64 = conn.del(key).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_from_config() {
        let config = RedisConfig::from_config(&Config::default());
        assert_eq!(config.url(), "redis://127.0.0.1:6379/0");
        assert_eq!(config.pool_min, 3);
        assert_eq!(config.pool_max, 10);
        assert_eq!(config.acquire_timeout, Duration::from_millis(100));
    }
}
