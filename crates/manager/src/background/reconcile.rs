//! Periodic refresh of the training task cache.
//!
//! Every `reconcile_interval` the full task list is pulled from the
//! training service and replaces the cache. A failed pull leaves the
//! previous cache in place until the next tick.

use std::sync::Arc;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::manager::Manager;

/// Run the reconciliation loop until `cancel` is triggered.
///
/// The first reconciliation happens immediately.
pub async fn run(manager: Arc<Manager>, cancel: CancellationToken) {
    let period = manager.config().reconcile_interval;

    tracing::info!(
        interval_ms = period.as_millis() as u64,
        "Training task reconciliation started"
    );

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        // An in-flight upstream call is abandoned on shutdown.
        let outcome = tokio::select! {
            _ = cancel.cancelled() => break,
            outcome = manager.reconcile_training_tasks() => outcome,
        };

        match outcome {
            Ok(count) => tracing::debug!(count, "Training tasks reconciled"),
            Err(e) => tracing::warn!(error = %e, "Training task reconciliation failed"),
        }
    }

    tracing::info!("Training task reconciliation stopping");
}
