//! Fast Tier Module
//!
//! Bounded in-process store combining HashMap storage with LRU tracking and
//! max-age expiry.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Fast Tier ==
/// Bounded LRU store with a fixed max-age window.
///
/// Invariant: `len() <= capacity()` after every operation. Not synchronized;
/// [`crate::cache::TieredCache`] wraps it in a mutex.
#[derive(Debug)]
pub struct FastTier {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    capacity: usize,
    max_age: Duration,
}

impl FastTier {
    // == Constructor ==
    /// Creates an empty tier. A zero capacity is raised to one.
    pub fn new(capacity: usize, max_age: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            capacity,
            max_age,
        }
    }

    // == Get ==
    /// Returns a clone of the value for `key` if present and younger than max-age.
    ///
    /// Expired entries are dropped on the spot and counted as misses. A hit marks
    /// the key most recently used.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(self.max_age),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.remove(key);
            self.stats.record_expiration();
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores `value` under `key`, restarting its max-age window.
    ///
    /// Inserting a new key at capacity evicts the least recently used entry
    /// first; overwriting an existing key never evicts. Returns the evicted key.
    pub fn set(&mut self, key: String, value: Value) -> Option<String> {
        let mut evicted = None;

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(oldest) = self.lru.pop_least_recent() {
                self.entries.remove(&oldest);
                self.stats.record_eviction();
                debug!(key = %oldest, "fast tier evicted least recently used entry");
                evicted = Some(oldest);
            }
        }

        self.lru.touch(&key);
        self.entries.insert(key, CacheEntry::new(value));
        self.stats.set_total_entries(self.entries.len());

        evicted
    }

    // == Remove ==
    /// Drops `key`, returning whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.forget(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Purge Expired ==
    /// Removes every entry past max-age. Returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let max_age = self.max_age;
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(max_age))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.forget(key);
            self.stats.record_expiration();
        }

        self.stats.set_total_entries(self.entries.len());
        expired.len()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;

    fn tier(capacity: usize) -> FastTier {
        FastTier::new(capacity, Duration::from_secs(60))
    }

    #[test]
    fn test_set_and_get() {
        let mut fast = tier(30);

        fast.set("menu".to_string(), json!(["home", "gallery"]));

        assert_eq!(fast.get("menu"), Some(json!(["home", "gallery"])));
        assert_eq!(fast.len(), 1);
    }

    #[test]
    fn test_get_missing() {
        let mut fast = tier(30);
        assert_eq!(fast.get("nope"), None);
        assert_eq!(fast.stats().fast_misses, 1);
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let mut fast = tier(2);

        fast.set("a".to_string(), json!(1));
        fast.set("b".to_string(), json!(2));
        let evicted = fast.set("a".to_string(), json!(10));

        assert_eq!(evicted, None);
        assert_eq!(fast.len(), 2);
        assert_eq!(fast.get("a"), Some(json!(10)));
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut fast = tier(3);

        fast.set("a".to_string(), json!(1));
        fast.set("b".to_string(), json!(2));
        fast.set("c".to_string(), json!(3));

        // reading "a" makes "b" the eviction candidate
        fast.get("a");
        let evicted = fast.set("d".to_string(), json!(4));

        assert_eq!(evicted.as_deref(), Some("b"));
        assert_eq!(fast.len(), 3);
        assert!(fast.contains("a"));
        assert!(!fast.contains("b"));
        assert_eq!(fast.stats().evictions, 1);
    }

    #[test]
    fn test_max_age_expiry_on_get() {
        let mut fast = FastTier::new(30, Duration::from_millis(20));

        fast.set("menu".to_string(), json!("x"));
        sleep(Duration::from_millis(30));

        assert_eq!(fast.get("menu"), None);
        assert!(fast.is_empty());
        let stats = fast.stats();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.fast_misses, 1);
    }

    #[test]
    fn test_overwrite_restarts_max_age() {
        let mut fast = FastTier::new(30, Duration::from_millis(40));

        fast.set("menu".to_string(), json!(1));
        sleep(Duration::from_millis(25));
        fast.set("menu".to_string(), json!(2));
        sleep(Duration::from_millis(25));

        assert_eq!(fast.get("menu"), Some(json!(2)));
    }

    #[test]
    fn test_purge_expired() {
        let mut fast = FastTier::new(30, Duration::from_millis(20));

        fast.set("a".to_string(), json!(1));
        fast.set("b".to_string(), json!(2));
        sleep(Duration::from_millis(30));
        fast.set("c".to_string(), json!(3));

        assert_eq!(fast.purge_expired(), 2);
        assert_eq!(fast.len(), 1);
        assert!(fast.contains("c"));
    }

    #[test]
    fn test_remove() {
        let mut fast = tier(30);

        fast.set("a".to_string(), json!(1));

        assert!(fast.remove("a"));
        assert!(!fast.remove("a"));
        assert!(fast.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut fast = FastTier::new(0, Duration::from_secs(60));
        assert_eq!(fast.capacity(), 1);

        fast.set("a".to_string(), json!(1));
        fast.set("b".to_string(), json!(2));

        assert_eq!(fast.len(), 1);
        assert!(fast.contains("b"));
    }

    #[test]
    fn test_empty_values_are_stored() {
        let mut fast = tier(30);

        fast.set("tags".to_string(), json!([]));

        assert_eq!(fast.get("tags"), Some(json!([])));
    }
}
