//! Remote Tier Module
//!
//! The narrow interface the tiered cache needs from a shared key-value store,
//! and an in-process implementation of it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::Result;

// == Remote Store ==
/// Network-shared key-value store behind the fast tier.
///
/// Values travel as JSON text. Implementations report failures through
/// [`crate::error::CacheError`]; the tiered cache decides what to do with them.
#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
    /// Fetches the raw value for `key`, `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` for `ttl_seconds`.
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Drops expired entries the store does not expire on its own.
    ///
    /// Returns how many were removed. Stores with server-side expiry keep the
    /// default, which does nothing.
    fn purge_expired(&self) -> usize {
        0
    }
}

// == Memory Remote ==
/// In-process [`RemoteStore`] with per-entry TTL.
///
/// Used for local development, tests, and as the fallback when the configured
/// network store cannot be reached at startup.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    /// Value and deadline; `None` never expires
    entries: Mutex<HashMap<String, (String, Option<Instant>)>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including ones not yet lazily expired.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some((_, deadline)) => is_past(*deadline, Instant::now()),
            None => return Ok(None),
        };

        if expired {
            entries.remove(key);
            return Ok(None);
        }

        Ok(entries.get(key).map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        // a TTL past what Instant can represent means no expiry
        let deadline = Instant::now().checked_add(Duration::from_secs(ttl_seconds));
        self.entries
            .lock()
            .insert(key.to_owned(), (value.to_owned(), deadline));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, (_, deadline)| !is_past(*deadline, now));
        before - entries.len()
    }
}

fn is_past(deadline: Option<Instant>, now: Instant) -> bool {
    deadline.is_some_and(|deadline| now >= deadline)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_remote_roundtrip() {
        let remote = MemoryRemote::new();

        remote.set("menu", r#"["home"]"#, 120).await.unwrap();

        assert_eq!(remote.get("menu").await.unwrap().as_deref(), Some(r#"["home"]"#));
        assert_eq!(remote.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_remote_zero_ttl_expires() {
        let remote = MemoryRemote::new();

        remote.set("menu", "1", 0).await.unwrap();

        assert_eq!(remote.get("menu").await.unwrap(), None);
        assert!(remote.is_empty());
    }

    #[tokio::test]
    async fn test_memory_remote_huge_ttl_never_expires() {
        let remote = MemoryRemote::new();

        remote.set("menu", "1", u64::MAX).await.unwrap();

        assert_eq!(remote.get("menu").await.unwrap().as_deref(), Some("1"));
        assert_eq!(remote.purge_expired(), 0);
    }

    #[tokio::test]
    async fn test_memory_remote_purge_drops_unread_expired_keys() {
        let remote = MemoryRemote::new();

        remote.set("stale-a", "1", 0).await.unwrap();
        remote.set("stale-b", "2", 0).await.unwrap();
        remote.set("fresh", "3", 120).await.unwrap();

        assert_eq!(remote.purge_expired(), 2);
        assert_eq!(remote.len(), 1);
        assert_eq!(remote.get("fresh").await.unwrap().as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_memory_remote_delete() {
        let remote = MemoryRemote::new();

        remote.set("menu", "1", 120).await.unwrap();
        remote.delete("menu").await.unwrap();
        remote.delete("never-set").await.unwrap();

        assert_eq!(remote.get("menu").await.unwrap(), None);
    }
}
