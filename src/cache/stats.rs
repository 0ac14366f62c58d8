//! Cache Statistics Module
//!
//! Counters for both tiers.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache performance counters.
///
/// Every lookup consults the fast tier first, so `fast_hits + fast_misses` is
/// the total number of lookups; `remote_*` counters only move on fast misses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered by the fast tier
    pub fast_hits: u64,
    /// Lookups the fast tier could not answer
    pub fast_misses: u64,
    /// Entries dropped by LRU eviction
    pub evictions: u64,
    /// Entries dropped because they outlived the fast-tier max-age
    pub expirations: u64,
    /// Fast misses answered by the remote tier
    pub remote_hits: u64,
    /// Fast misses the remote tier had no value for
    pub remote_misses: u64,
    /// Remote operations that failed or timed out (reads and writes)
    pub remote_errors: u64,
    /// Current number of fast-tier entries
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Share of lookups answered by either tier, 0.0 when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.fast_hits + self.fast_misses;
        if lookups == 0 {
            0.0
        } else {
            (self.fast_hits + self.remote_hits) as f64 / lookups as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.fast_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.fast_misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Remote Counters ==
/// Lock-free counters for the remote tier.
///
/// Remote writes run on detached tasks, so these live behind an `Arc` rather
/// than inside the fast-tier mutex.
#[derive(Debug, Default)]
pub struct RemoteCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    errors: AtomicU64,
}

impl RemoteCounters {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the remote counters into `stats`.
    pub fn fill(&self, stats: &mut CacheStats) {
        stats.remote_hits = self.hits.load(Ordering::Relaxed);
        stats.remote_misses = self.misses.load(Ordering::Relaxed);
        stats.remote_errors = self.errors.load(Ordering::Relaxed);
    }
}
