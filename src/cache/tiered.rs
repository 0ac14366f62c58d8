//! Tiered Cache Module
//!
//! Read-through cache: a bounded in-process fast tier in front of a shared
//! remote store. Remote failures never reach the caller; they degrade to misses.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::cache::write_order::WriteOrder;
use crate::cache::{CacheStats, FastTier, RemoteCounters, RemoteStore, MAX_TTL_SECONDS};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Tiered Cache ==
/// Two-tier read-through cache.
///
/// Build one at startup and share it behind an `Arc`.
pub struct TieredCache {
    fast: Mutex<FastTier>,
    remote: Arc<dyn RemoteStore>,
    counters: Arc<RemoteCounters>,
    /// Orders remote writes and deletes per key
    order: Arc<WriteOrder>,
    /// TTL in seconds used for remote writes without an explicit TTL
    default_ttl: u64,
    /// Upper bound on every remote call
    remote_timeout: Duration,
}

impl TieredCache {
    // == Constructor ==
    pub fn new(
        fast_capacity: usize,
        fast_max_age: Duration,
        remote: Arc<dyn RemoteStore>,
        default_ttl: u64,
        remote_timeout: Duration,
    ) -> Self {
        Self {
            fast: Mutex::new(FastTier::new(fast_capacity, fast_max_age)),
            remote,
            counters: Arc::new(RemoteCounters::default()),
            order: Arc::new(WriteOrder::default()),
            default_ttl,
            remote_timeout,
        }
    }

    pub fn from_config(config: &Config, remote: Arc<dyn RemoteStore>) -> Self {
        Self::new(
            config.fast_capacity,
            config.fast_max_age,
            remote,
            config.default_ttl,
            config.remote_timeout,
        )
    }

    // == Get ==
    /// Looks `key` up in the fast tier, then the remote tier.
    ///
    /// A fast-tier hit returns without touching the remote store. A remote hit
    /// is copied into the fast tier before being returned. Remote errors,
    /// timeouts and undecodable payloads are logged and reported as `None`.
    /// A remote JSON `null` counts as absent and is not copied.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let cached = self.fast.lock().get(key);
        if cached.is_some() {
            debug!(key, "fast tier hit");
            return cached;
        }

        let raw = match bounded(self.remote_timeout, self.remote.get(key)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.counters.record_miss();
                debug!(key, "cache miss on both tiers");
                return None;
            }
            Err(err) => {
                self.counters.record_error();
                warn!(key, error = %err, "remote cache read failed, treating as miss");
                return None;
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                self.counters.record_error();
                warn!(key, error = %err, "remote cache held undecodable value, treating as miss");
                return None;
            }
        };

        if value.is_null() {
            self.counters.record_miss();
            return None;
        }

        self.counters.record_hit();
        debug!(key, "remote tier hit, populating fast tier");
        self.fast.lock().set(key.to_owned(), value.clone());
        Some(value)
    }

    // == Set ==
    /// Stores `value` in the fast tier now and in the remote tier in the background.
    ///
    /// The remote write uses `ttl_seconds`, or the default TTL when it is `None`
    /// or zero, capped at [`MAX_TTL_SECONDS`]. Its failure is logged and
    /// otherwise ignored. Remote writes and deletes for one key land in call
    /// order; a write overtaken by a later `set` or `delete` is dropped.
    /// Outside a tokio runtime only the fast tier is written. A JSON `null`
    /// reads back as absent, so it is not stored in either tier.
    pub fn set(&self, key: &str, value: Value, ttl_seconds: Option<u64>) {
        if value.is_null() {
            debug!(key, "null value not cached");
            return;
        }
        self.fast.lock().set(key.to_owned(), value.clone());

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(self.remote_write(key, value, ttl_seconds));
            }
            Err(_) => warn!(key, "no async runtime, remote cache write skipped"),
        }
    }

    // == Write Through ==
    /// Like [`TieredCache::set`], but waits for the remote write to finish.
    pub async fn write_through(&self, key: &str, value: Value, ttl_seconds: Option<u64>) {
        if value.is_null() {
            debug!(key, "null value not cached");
            return;
        }
        self.fast.lock().set(key.to_owned(), value.clone());
        self.remote_write(key, value, ttl_seconds).await;
    }

    // == Delete ==
    /// Removes `key` from both tiers. Remote failures are logged.
    ///
    /// Remote writes for `key` issued before the delete are either finished
    /// first or dropped, so they cannot bring the value back.
    pub async fn delete(&self, key: &str) {
        self.fast.lock().remove(key);

        let ticket = self.order.register(key);
        let limit = self.remote_timeout;
        let outcome = self
            .order
            .run(ticket, || bounded(limit, self.remote.delete(key)))
            .await;

        if let Some(Err(err)) = outcome {
            self.counters.record_error();
            warn!(key, error = %err, "remote cache delete failed");
        }
    }

    // == Typed Access ==
    /// [`TieredCache::get`] decoded into `T`. A value of the wrong shape is a miss.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key).await?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!(key, error = %err, "cached value has unexpected shape, treating as miss");
                None
            }
        }
    }

    /// [`TieredCache::set`] for any serializable value.
    pub fn set_as<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: Option<u64>) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.set(key, value, ttl_seconds);
        Ok(())
    }

    // == Get Or Compute ==
    /// Returns the cached `T` for `key`, or runs `compute`, caches and returns its result.
    ///
    /// Errors from `compute` are returned unchanged and nothing is cached.
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        key: &str,
        ttl_seconds: Option<u64>,
        compute: F,
    ) -> std::result::Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(hit) = self.get_as::<T>(key).await {
            return Ok(hit);
        }

        let value = compute().await?;
        if let Err(err) = self.set_as(key, &value, ttl_seconds) {
            warn!(key, error = %err, "computed value could not be cached");
        }
        Ok(value)
    }

    // == Maintenance ==
    /// Drops fast-tier entries past their max-age.
    pub fn purge_expired(&self) -> usize {
        self.fast.lock().purge_expired()
    }

    /// Drops expired remote entries the remote store keeps until read.
    pub fn purge_remote_expired(&self) -> usize {
        self.remote.purge_expired()
    }

    /// Combined counters of both tiers.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.fast.lock().stats();
        self.counters.fill(&mut stats);
        stats
    }

    /// Number of fast-tier entries.
    pub fn len(&self) -> usize {
        self.fast.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fast.lock().is_empty()
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    /// Keys with a remote write or delete still in flight.
    pub fn pending_remote_writes(&self) -> usize {
        self.order.pending()
    }

    /// Builds the detached remote write for `set` and `write_through`.
    ///
    /// The write takes its place in the key's order now, not when it runs.
    fn remote_write(
        &self,
        key: &str,
        value: Value,
        ttl_seconds: Option<u64>,
    ) -> impl Future<Output = ()> + Send + 'static {
        let remote = Arc::clone(&self.remote);
        let counters = Arc::clone(&self.counters);
        let order = Arc::clone(&self.order);
        let ticket = order.register(key);
        let key = key.to_owned();
        let ttl = ttl_seconds
            .filter(|ttl| *ttl > 0)
            .unwrap_or(self.default_ttl)
            .min(MAX_TTL_SECONDS);
        let limit = self.remote_timeout;

        async move {
            let payload = value.to_string();
            let outcome = order
                .run(ticket, || bounded(limit, remote.set(&key, &payload, ttl)))
                .await;

            match outcome {
                Some(Ok(())) => debug!(key = %key, ttl, "remote cache write stored"),
                Some(Err(err)) => {
                    counters.record_error();
                    warn!(key = %key, error = %err, "remote cache write failed");
                }
                None => debug!(key = %key, "remote cache write superseded, skipped"),
            }
        }
    }
}

/// Runs a remote operation, failing with `CacheError::Timeout` after `limit`.
async fn bounded<T>(limit: Duration, op: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::time::timeout(limit, op)
        .await
        .map_err(|_| CacheError::Timeout(format!("remote store did not answer within {limit:?}")))?
}
