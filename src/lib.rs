//! Folio Cache - caching for the blog and photo gallery
//!
//! A two-tier read-through cache (in-process LRU in front of a shared remote
//! store) and the page merging used to assemble paginated lists.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheKey, TieredCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use pagination::{merge, read, KeyArgs, PageArgs, PageCache};
pub use tasks::spawn_cleanup_task;
