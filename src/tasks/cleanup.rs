//! Fast-Tier Sweep Task
//!
//! Background task that periodically drops fast-tier entries past their max-age,
//! and expired entries the remote store only expires on read.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TieredCache;

/// Spawns a background task that sweeps expired entries from both tiers.
///
/// Expired entries are also dropped lazily on lookup; the sweep keeps idle
/// keys from holding fast-tier slots until they are evicted.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(cache: Arc<TieredCache>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting fast-tier sweep with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired();
            let remote_removed = cache.purge_remote_expired();
            if removed > 0 || remote_removed > 0 {
                info!(
                    "Sweep: removed {} fast-tier and {} remote entries",
                    removed, remote_removed
                );
            } else {
                debug!("Sweep: no expired entries found");
            }
        }
    })
}
