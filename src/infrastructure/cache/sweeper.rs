//! Background removal of expired cache entries

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::cache::HotelCache;
use crate::infrastructure::observability::record_cache_sweep;

/// Runs one sweep, logging rather than propagating failures
pub async fn sweep_once(cache: &dyn HotelCache) -> usize {
    match cache.sweep_expired().await {
        Ok(removed) => {
            record_cache_sweep(cache.backend_name(), removed);

            if removed > 0 {
                info!(removed = removed, backend = cache.backend_name(), "Swept expired cache entries");
            } else {
                debug!(backend = cache.backend_name(), "Cache sweep found nothing to remove");
            }
            removed
        }
        Err(e) => {
            warn!(error = %e, backend = cache.backend_name(), "Cache sweep failed");
            0
        }
    }
}

/// Spawns a task sweeping `cache` every `interval`
///
/// Returns `None` when `interval` is zero, which disables sweeping.
pub fn spawn_sweeper(cache: Arc<dyn HotelCache>, interval: Duration) -> Option<JoinHandle<()>> {
    if interval.is_zero() {
        info!("Cache sweeper disabled");
        return None;
    }

    info!(interval_secs = interval.as_secs(), "Starting cache sweeper");

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            sweep_once(cache.as_ref()).await;
        }
    }))
}
