//! Cache Module
//!
//! Two-tier read-through caching: a bounded LRU fast tier in front of a
//! shared remote store.

mod entry;
mod fast;
mod keys;
mod lru;
#[cfg(feature = "redis")]
mod redis_remote;
mod remote;
mod stats;
mod tiered;
mod write_order;


// Re-export public types
pub use entry::CacheEntry;
pub use fast::FastTier;
pub use keys::{canonical_json, CacheKey};
pub use lru::LruTracker;
#[cfg(feature = "redis")]
pub use redis_remote::{RedisConfig, RedisRemote};
pub use remote::{MemoryRemote, RemoteStore};
pub use stats::{CacheStats, RemoteCounters};
pub use tiered::TieredCache;

// == Public Constants ==
/// Default fast-tier capacity in entries
pub const DEFAULT_FAST_CAPACITY: usize = 30;

/// Default fast-tier max-age in seconds
pub const DEFAULT_FAST_MAX_AGE: u64 = 60;

/// Default remote TTL in seconds when a write does not name one
pub const DEFAULT_REMOTE_TTL: u64 = 120;

/// Longest remote TTL in seconds (30 days); longer requests are capped
pub const MAX_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;

/// Maximum accepted key length in bytes
pub const MAX_KEY_LENGTH: usize = 1024;

/// Maximum accepted serialized value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
