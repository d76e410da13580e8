//! TTL Purge Task
//!
//! Background task that periodically removes expired cache entries from
//! both tiers. Lookups already evict lazily; the sweep bounds the
//! footprint of keys that are never read again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TieredCache;

/// Spawns a background task that periodically purges expired entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps.
///
/// # Arguments
/// * `cache` - Shared reference to the tiered cache
/// * `purge_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
pub fn spawn_purge_task(cache: Arc<TieredCache>, purge_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(purge_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting TTL purge task with interval of {} seconds",
            purge_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let purged = cache.purge_expired();

            if purged > 0 {
                info!("TTL purge: removed {} expired entries", purged);
            } else {
                debug!("TTL purge: no expired entries found");
            }
        }
    })
}
