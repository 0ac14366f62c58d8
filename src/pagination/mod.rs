//! Pagination Module
//!
//! Merges paginated query results into one ordered list per field policy.

mod args;
mod merge;
mod policy;
mod store;

#[cfg(test)]
mod property_tests;

pub use args::PageArgs;
pub use merge::{merge, read, Sequence, MAX_SEQUENCE_LEN};
pub use policy::KeyArgs;
pub use store::{PageCache, DEFAULT_MAX_SEQUENCES};
