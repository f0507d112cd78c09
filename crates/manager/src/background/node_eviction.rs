//! Periodic removal of nodes that stopped sending heartbeats.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::manager::Manager;

/// Run the eviction sweep until `cancel` is triggered.
///
/// Every `node_check_interval`, nodes whose last heartbeat is older than
/// `max_age` are dropped from the registry.
pub async fn run(manager: Arc<Manager>, max_age: Duration, cancel: CancellationToken) {
    let check_interval = manager.config().node_check_interval;

    tracing::info!(
        max_age_secs = max_age.as_secs(),
        interval_secs = check_interval.as_secs(),
        "Stale node eviction started"
    );

    let mut interval = tokio::time::interval(check_interval);
    // The first tick completes immediately; nothing can be stale yet.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Stale node eviction stopping");
                break;
            }
            _ = interval.tick() => {
                let evicted = manager.registry().evict_stale(max_age).await;
                if evicted.is_empty() {
                    tracing::debug!("Stale node eviction: nothing to evict");
                } else {
                    tracing::warn!(
                        count = evicted.len(),
                        node_ids = ?evicted,
                        "Evicted nodes with no recent heartbeat"
                    );
                }
            }
        }
    }
}
