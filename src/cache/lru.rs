//! LRU Tracker Module
//!
//! Recency bookkeeping for fast-tier eviction.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks key recency for the fast tier.
///
/// Keys are kept in a VecDeque ordered from least recently used (front) to most
/// recently used (back). The fast tier is small (tens of entries), so the linear
/// scans in `touch` and `forget` stay cheap.
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks `key` as the most recently used, adding it if unknown.
    pub fn touch(&mut self, key: &str) {
        self.forget(key);
        self.order.push_back(key.to_owned());
    }

    // == Forget ==
    /// Stops tracking `key`. Unknown keys are ignored.
    pub fn forget(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    // == Pop Least Recent ==
    /// Removes and returns the least recently used key.
    pub fn pop_least_recent(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    // == Least Recent ==
    /// The next eviction candidate, without removing it.
    pub fn least_recent(&self) -> Option<&str> {
        self.order.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
