//! Page Cache Module
//!
//! Host-side store for paginated fields: applies each field's policy and keeps
//! the merged sequences, bounded by a least-recently-used limit.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::cache::LruTracker;
use crate::error::{CacheError, Result};
use crate::pagination::{merge, read, KeyArgs, PageArgs, Sequence};

/// Default number of sequences kept across all fields
pub const DEFAULT_MAX_SEQUENCES: usize = 256;

// == Page Cache ==
/// Merged sequences of JSON items, addressed by field policy.
///
/// Each write holds the lock for the whole read-merge-store cycle, so
/// concurrent pages for the same sequence are applied one after another.
/// Partitioned fields create a sequence per argument value; once
/// `max_sequences` are stored, writing a new one drops the least recently used.
#[derive(Debug)]
pub struct PageCache {
    policies: HashMap<String, KeyArgs>,
    max_sequences: usize,
    stored: Mutex<Stored>,
}

#[derive(Debug, Default)]
struct Stored {
    sequences: HashMap<String, Sequence<Value>>,
    lru: LruTracker,
}

impl Default for PageCache {
    fn default() -> Self {
        Self {
            policies: HashMap::new(),
            max_sequences: DEFAULT_MAX_SEQUENCES,
            stored: Mutex::default(),
        }
    }
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paginated fields of the blog and gallery:
    /// - `posts`: one shared list
    /// - `postsByCategory`: one list per `category`
    /// - `galleryPhotos`: one list per `album`, `all` when unfiltered
    pub fn blog_defaults() -> Self {
        Self::new()
            .with_field("posts", KeyArgs::Shared)
            .with_field("postsByCategory", KeyArgs::fields(["category"]))
            .with_field(
                "galleryPhotos",
                KeyArgs::custom(|args| match args.get("album") {
                    Some(Value::String(album)) => album,
                    Some(other) => other.to_string(),
                    None => "all".to_string(),
                }),
            )
    }

    // == Register ==
    /// Registers (or replaces) the policy for `field`.
    pub fn with_field(mut self, field: impl Into<String>, key_args: KeyArgs) -> Self {
        self.policies.insert(field.into(), key_args);
        self
    }

    /// Caps the number of stored sequences. Zero is raised to one.
    pub fn with_max_sequences(mut self, max_sequences: usize) -> Self {
        self.max_sequences = max_sequences.max(1);
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }

    pub fn max_sequences(&self) -> usize {
        self.max_sequences
    }

    // == Storage Key ==
    /// Key of the sequence `args` address within `field`.
    pub fn storage_key(&self, field: &str, args: Option<&PageArgs>) -> Result<String> {
        self.policies
            .get(field)
            .map(|policy| policy.storage_key(field, args))
            .ok_or_else(|| CacheError::NotFound(format!("no page policy for field '{field}'")))
    }

    // == Write Page ==
    /// Merges `items` into the addressed sequence and returns the result.
    pub fn write_page(
        &self,
        field: &str,
        args: Option<&PageArgs>,
        items: &[Value],
    ) -> Result<(String, Sequence<Value>)> {
        let key = self.storage_key(field, args)?;
        let mut stored = self.stored.lock();

        let merged = merge(stored.sequences.get(&key).map(Vec::as_slice), items, args)?;

        if !stored.sequences.contains_key(&key) && stored.sequences.len() >= self.max_sequences {
            if let Some(oldest) = stored.lru.pop_least_recent() {
                stored.sequences.remove(&oldest);
                debug!(key = %oldest, "dropped least recently used page sequence");
            }
        }

        debug!(key = %key, page = items.len(), len = merged.len(), "merged page");
        stored.lru.touch(&key);
        stored.sequences.insert(key.clone(), merged.clone());

        Ok((key, merged))
    }

    // == Read Field ==
    /// The addressed sequence, `None` when nothing was stored yet.
    pub fn read_field(
        &self,
        field: &str,
        args: Option<&PageArgs>,
    ) -> Result<(String, Option<Sequence<Value>>)> {
        let key = self.storage_key(field, args)?;
        let mut stored = self.stored.lock();
        let found = stored.sequences.get(&key).cloned();
        if found.is_some() {
            stored.lru.touch(&key);
        }
        Ok((key, read(found, args)))
    }

    // == Evict ==
    /// Drops the addressed sequence, returning whether one was stored.
    pub fn evict(&self, field: &str, args: Option<&PageArgs>) -> Result<bool> {
        let key = self.storage_key(field, args)?;
        let mut stored = self.stored.lock();
        stored.lru.forget(&key);
        Ok(stored.sequences.remove(&key).is_some())
    }

    /// Number of stored sequences across all fields.
    pub fn len(&self) -> usize {
        self.stored.lock().sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stored.lock().sequences.is_empty()
    }
}
