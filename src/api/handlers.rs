//! API Handlers
//!
//! HTTP request handlers for each cache service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{RemoteStore, TieredCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, PageReadRequest, PageResponse,
    PageWriteRequest, SetRequest, SetResponse, StatsResponse,
};
use crate::pagination::PageCache;

/// Application state shared across all handlers.
///
/// Both caches are built once at startup and shared by `Arc`; they synchronize
/// internally.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<TieredCache>,
    pub pages: Arc<PageCache>,
}

impl AppState {
    pub fn new(cache: TieredCache, pages: PageCache) -> Self {
        Self {
            cache: Arc::new(cache),
            pages: Arc::new(pages),
        }
    }

    /// Builds the tiered cache from `config` over `remote`, with the blog's
    /// page policies and sequence limit.
    pub fn from_config(config: &Config, remote: Arc<dyn RemoteStore>) -> Self {
        Self::new(
            TieredCache::from_config(config, remote),
            PageCache::blog_defaults().with_max_sequences(config.page_max_sequences),
        )
    }
}

/// Handler for PUT /set
///
/// Returns as soon as the fast tier holds the value; the remote write
/// continues in the background.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.cache.set(&req.key, req.value, req.ttl);

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state
        .cache
        .get(&key)
        .await
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    state.cache.delete(&key).await;
    Json(DeleteResponse::new(key))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.cache.stats(), state.pages.len()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for POST /pages/:field
///
/// Merges the page into the sequence its arguments address and returns the
/// merged sequence.
pub async fn page_write_handler(
    State(state): State<AppState>,
    Path(field): Path<String>,
    Json(req): Json<PageWriteRequest>,
) -> Result<Json<PageResponse>> {
    let (storage_key, items) = state
        .pages
        .write_page(&field, req.args.as_ref(), &req.items)?;

    Ok(Json(PageResponse::new(field, storage_key, Some(items))))
}

/// Handler for POST /pages/:field/read
pub async fn page_read_handler(
    State(state): State<AppState>,
    Path(field): Path<String>,
    Json(req): Json<PageReadRequest>,
) -> Result<Json<PageResponse>> {
    let (storage_key, items) = state.pages.read_field(&field, req.args.as_ref())?;

    Ok(Json(PageResponse::new(field, storage_key, items)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryRemote;
    use serde_json::json;

    fn test_state() -> AppState {
        AppState::from_config(&Config::default(), Arc::new(MemoryRemote::new()))
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        let req = SetRequest {
            key: "menu".to_string(),
            value: json!(["home", "gallery"]),
            ttl: None,
        };
        let result = set_handler(State(state.clone()), Json(req)).await;
        assert!(result.is_ok());

        let response = get_handler(State(state), Path("menu".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, json!(["home", "gallery"]));
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let result = get_handler(State(test_state()), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();
        state.cache.write_through("to_delete", json!(1), None).await;

        let response = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert_eq!(response.key, "to_delete");

        let result = get_handler(State(state), Path("to_delete".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let response = stats_handler(State(test_state())).await;
        assert_eq!(response.stats.fast_hits, 0);
        assert_eq!(response.page_sequences, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let req = SetRequest {
            key: "".to_string(),
            value: json!(1),
            ttl: None,
        };
        let result = set_handler(State(test_state()), Json(req)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_page_write_then_read() {
        let state = test_state();

        let write = PageWriteRequest {
            args: Some(crate::pagination::PageArgs::at(2, 1)),
            items: vec![json!("c")],
        };
        let written = page_write_handler(State(state.clone()), Path("posts".to_string()), Json(write))
            .await
            .unwrap();
        assert_eq!(written.items, Some(vec![None, None, Some(json!("c"))]));

        let read = page_read_handler(
            State(state),
            Path("posts".to_string()),
            Json(PageReadRequest::default()),
        )
        .await
        .unwrap();
        assert_eq!(read.storage_key, "posts");
        assert_eq!(read.items, written.items);
    }
}
