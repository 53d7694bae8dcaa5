//! TTL Sweep Task
//!
//! Background task that periodically removes expired entries from one cache,
//! bounding memory growth from keys that are written but never read again.

use std::sync::Weak;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TtlCache;

/// Spawns a task that purges expired entries from `cache` every `interval`.
///
/// The task holds only a weak reference and exits once the cache is gone.
/// The returned handle is owned by the cache, which aborts it on
/// `stop_sweep`, `destroy` or drop.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(TtlCache::new(1000));
/// let handle = spawn_sweep_task(Arc::downgrade(&cache), Duration::from_secs(300));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task<T>(cache: Weak<TtlCache<T>>, interval: Duration) -> JoinHandle<()>
where
    T: Clone + Serialize + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;

            let Some(cache) = cache.upgrade() else {
                debug!("Cache dropped, sweep task exiting");
                break;
            };

            let removed = cache.purge_expired();

            if removed > 0 {
                info!(cache = %cache.name(), removed, "TTL sweep removed expired entries");
            } else {
                debug!(cache = %cache.name(), "TTL sweep found no expired entries");
            }
        }
    })
}
