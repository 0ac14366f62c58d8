//! Background Tasks Module
//!
//! Contains background tasks that run periodically during service operation.
//!
//! # Tasks
//! - Fast-tier sweep: removes entries past the fast-tier max-age

mod cleanup;

pub use cleanup::spawn_cleanup_task;
