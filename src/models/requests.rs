//! Request DTOs for the cache service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::{MAX_KEY_LENGTH, MAX_TTL_SECONDS, MAX_VALUE_SIZE};
use crate::pagination::PageArgs;

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value except `null`, which reads back as absent
/// - `ttl`: Optional remote TTL in seconds (uses the default if not specified)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        if self.value.is_null() {
            return Some("Value cannot be null".to_string());
        }
        if let Some(ttl) = self.ttl.filter(|ttl| *ttl > MAX_TTL_SECONDS) {
            return Some(format!(
                "TTL of {} seconds exceeds maximum of {} seconds",
                ttl, MAX_TTL_SECONDS
            ));
        }
        if self.value.to_string().len() > MAX_VALUE_SIZE {
            return Some(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            ));
        }
        None
    }
}

/// Request body for POST /pages/:field
#[derive(Debug, Clone, Deserialize)]
pub struct PageWriteRequest {
    #[serde(default)]
    pub args: Option<PageArgs>,
    pub items: Vec<Value>,
}

/// Request body for POST /pages/:field/read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageReadRequest {
    #[serde(default)]
    pub args: Option<PageArgs>,
}
