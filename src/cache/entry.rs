//! Cache Entry Module
//!
//! Defines the fast-tier entry and its age-based expiry.

use std::time::{Duration, Instant};

use serde_json::Value;

// == Cache Entry ==
/// A single fast-tier entry.
///
/// The fast tier does not honour per-key TTLs; every entry lives for the tier's
/// fixed max-age window counted from its last write.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// When the value was written
    pub inserted_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current instant.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    // == Age ==
    /// Time elapsed since the entry was written.
    pub fn age(&self) -> Duration {
        self.inserted_at.elapsed()
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `max_age`.
    ///
    /// Boundary condition: an entry whose age equals `max_age` is expired, so a
    /// zero max-age tier never serves a hit.
    pub fn is_expired(&self, max_age: Duration) -> bool {
        self.age() >= max_age
    }

    // == Remaining ==
    /// Returns how long the entry stays servable, `Duration::ZERO` once expired.
    pub fn remaining(&self, max_age: Duration) -> Duration {
        max_age.saturating_sub(self.age())
    }
}
