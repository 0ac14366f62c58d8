//! API Routes
//!
//! Configures the Axum router with all cache service endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, get_handler, health_handler, page_read_handler, page_write_handler,
    set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a value in both tiers
/// - `GET /get/:key` - Read through both tiers
/// - `DELETE /del/:key` - Remove a key from both tiers
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check
/// - `POST /pages/:field` - Merge a page into a paginated field
/// - `POST /pages/:field/read` - Read a paginated field
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .route("/pages/:field", post(page_write_handler))
        .route("/pages/:field/read", post(page_read_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
