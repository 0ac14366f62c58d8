//! API Module
//!
//! HTTP handlers and routing for the cache service.
//!
//! # Endpoints
//! - `PUT /set` - Store a value
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint
//! - `POST /pages/:field` - Merge a page of a paginated field
//! - `POST /pages/:field/read` - Read a paginated field

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
