//! Periodic registry cache refresh.
//!
//! Mutations made through this instance refresh the cache themselves. The
//! periodic pass picks up writes other instances made to a shared store.

use hm_01_channel_registry::RegistryCache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub fn spawn_cache_refresh(
    cache: Arc<RegistryCache>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; startup already loaded the cache.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match cache.refresh().await {
                        Ok(()) => debug!(
                            channels = cache.snapshot().len(),
                            "Registry cache refreshed"
                        ),
                        Err(e) => warn!(error = %e, "Periodic cache refresh failed"),
                    }
                }
                _ = shutdown.changed() => {
                    info!("Cache refresh task stopping");
                    break;
                }
            }
        }
    })
}
