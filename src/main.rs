//! Folio Cache - caching service for the blog and photo gallery
//!
//! Serves the two-tier cache and the paginated-list merge over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_cache::api::{create_router, AppState};
use folio_cache::cache::{MemoryRemote, RemoteStore};
use folio_cache::config::{Config, RemoteBackend};
use folio_cache::spawn_cleanup_task;

/// Main entry point for the cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Connect the remote tier (falls back to an in-process store)
/// 4. Build the tiered cache and page cache
/// 5. Start background fast-tier sweep
/// 6. Serve HTTP on the configured port until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio Cache service");

    let config = Config::from_env();
    config.validate().context("invalid configuration")?;
    info!(
        "Configuration loaded: fast_capacity={}, fast_max_age={:?}, default_ttl={}s, backend={:?}, port={}",
        config.fast_capacity,
        config.fast_max_age,
        config.default_ttl,
        config.remote_backend,
        config.server_port
    );

    let remote = build_remote(&config).await;
    let state = AppState::from_config(&config, remote);
    info!("Caches initialized");

    let cleanup_handle = spawn_cleanup_task(state.cache.clone(), config.cleanup_interval);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Picks the remote tier named by the configuration.
async fn build_remote(config: &Config) -> Arc<dyn RemoteStore> {
    match config.remote_backend {
        RemoteBackend::Memory => {
            info!("Using in-process remote tier");
            Arc::new(MemoryRemote::new())
        }
        RemoteBackend::Redis => connect_redis(config).await,
    }
}

#[cfg(feature = "redis")]
async fn connect_redis(config: &Config) -> Arc<dyn RemoteStore> {
    use folio_cache::cache::{RedisConfig, RedisRemote};

    match RedisRemote::connect(&RedisConfig::from_config(config)).await {
        Ok(remote) => Arc::new(remote),
        Err(err) => {
            error!(error = %err, "Redis unreachable, falling back to in-process remote tier");
            Arc::new(MemoryRemote::new())
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn connect_redis(_config: &Config) -> Arc<dyn RemoteStore> {
    error!("Built without the redis feature, falling back to in-process remote tier");
    Arc::new(MemoryRemote::new())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cleanup_handle.abort();
    warn!("Fast-tier sweep aborted");
}
