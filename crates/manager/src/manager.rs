//! The coordinator's central state holder.
//!
//! [`Manager`] is created once at startup via [`Manager::start`], which
//! also spawns the background daemons. The returned `Arc` is cloned into
//! request handlers. Each piece of shared state (node registry, training
//! task cache, benchmark history) has its own lock, and no method holds
//! two of them at once or holds one across an upstream call.

use std::sync::Arc;
use std::time::Duration;

use ced_core::benchmark::BenchmarkHistory;
use ced_core::inference::InferenceInstanceInfo;
use ced_core::node::{NodeResourceStats, Region, RegionFilter};
use ced_core::resources::{ResourceOverview, ResourceStats};
use ced_core::training::{TaskLog, TrainingTaskDetail, TrainingTaskSummary};
use ced_core::types::now_epoch_secs;
use ced_upstream::{InferenceService, TrainingService, UpstreamError};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::background;
use crate::config::ManagerConfig;
use crate::error::ManagerError;
use crate::registry::NodeRegistry;

/// How long [`Manager::shutdown`] waits for each daemon to exit.
const DAEMON_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Fleet coordinator state and upstream relay.
pub struct Manager {
    registry: NodeRegistry,
    pub(crate) training_tasks: RwLock<Vec<TrainingTaskDetail>>,
    pub(crate) benchmarks: RwLock<Vec<BenchmarkHistory>>,
    pub(crate) training: Arc<dyn TrainingService>,
    pub(crate) inference: Arc<dyn InferenceService>,
    config: ManagerConfig,
    /// Master cancellation token -- cancelled during shutdown.
    cancel: CancellationToken,
    daemons: Mutex<Vec<JoinHandle<()>>>,
}

impl Manager {
    /// Build a manager without starting any background daemon.
    pub fn new(
        config: ManagerConfig,
        training: Arc<dyn TrainingService>,
        inference: Arc<dyn InferenceService>,
    ) -> Self {
        Self {
            registry: NodeRegistry::new(),
            training_tasks: RwLock::new(Vec::new()),
            benchmarks: RwLock::new(Vec::new()),
            training,
            inference,
            config,
            cancel: CancellationToken::new(),
            daemons: Mutex::new(Vec::new()),
        }
    }

    /// Build a manager and spawn its background daemons: one task
    /// reconciliation loop and, unless disabled, one stale-node sweeper.
    pub async fn start(
        config: ManagerConfig,
        training: Arc<dyn TrainingService>,
        inference: Arc<dyn InferenceService>,
    ) -> Arc<Self> {
        let manager = Arc::new(Self::new(config, training, inference));

        let mut daemons = manager.daemons.lock().await;
        daemons.push(tokio::spawn(background::reconcile::run(
            Arc::clone(&manager),
            manager.cancel.child_token(),
        )));
        if let Some(max_age) = manager.config.node_stale_timeout {
            daemons.push(tokio::spawn(background::node_eviction::run(
                Arc::clone(&manager),
                max_age,
                manager.cancel.child_token(),
            )));
        }
        drop(daemons);

        manager
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Stop the background daemons, waiting up to 5 seconds for each.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down manager");
        self.cancel.cancel();

        let mut daemons = self.daemons.lock().await;
        for handle in daemons.drain(..) {
            match tokio::time::timeout(DAEMON_SHUTDOWN_TIMEOUT, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "Background daemon panicked"),
                Err(_) => tracing::warn!(
                    timeout_secs = DAEMON_SHUTDOWN_TIMEOUT.as_secs(),
                    "Background daemon did not stop in time",
                ),
            }
        }

        tracing::info!("Manager shut down complete");
    }

    // ---- nodes ----

    /// Record a heartbeat.
    pub async fn update_node_stats(&self, node_id: &str, stats: NodeResourceStats) {
        self.registry.upsert(node_id, stats).await;
    }

    pub async fn get_node_stats(&self, node_id: &str) -> Result<NodeResourceStats, ManagerError> {
        Ok(self.registry.get(node_id).await?)
    }

    pub async fn list_all_node_stats(&self) -> Vec<NodeResourceStats> {
        self.registry.list_all().await
    }

    pub async fn list_node_stats_by_region(&self, region: Region) -> Vec<NodeResourceStats> {
        self.registry.list_by_region(region).await
    }

    /// Node listing for a region filter (`All` or a single region).
    pub async fn list_node_stats(&self, filter: RegionFilter) -> Vec<NodeResourceStats> {
        match filter {
            RegionFilter::All => self.list_all_node_stats().await,
            RegionFilter::Only(region) => self.list_node_stats_by_region(region).await,
        }
    }

    pub async fn get_resource_stats(&self) -> ResourceStats {
        self.registry.aggregate().await
    }

    /// Node totals plus the cached training workload.
    ///
    /// The registry lock is released before the task cache is read.
    pub async fn get_resource_overview(&self) -> ResourceOverview {
        let resources = self.registry.aggregate().await;
        let training_tasks = self.get_training_task_summaries().await;
        ResourceOverview {
            resources,
            training_task_count: training_tasks.len(),
            training_tasks,
        }
    }

    // ---- training ----

    /// The reconciled task cache. Does not poll upstream.
    pub async fn get_training_task_list(&self) -> Vec<TrainingTaskDetail> {
        self.training_tasks.read().await.clone()
    }

    /// List-view projection of the task cache, durations evaluated now.
    pub async fn get_training_task_summaries(&self) -> Vec<TrainingTaskSummary> {
        let now = now_epoch_secs();
        self.training_tasks
            .read()
            .await
            .iter()
            .map(|task| task.summary(now))
            .collect()
    }

    pub async fn get_training_task_log(&self, task_id: &str) -> Result<TaskLog, ManagerError> {
        let logs = self.training.get_task_log(task_id).await?;
        Ok(TaskLog {
            task_id: task_id.to_string(),
            logs,
        })
    }

    /// Pull the authoritative task list and replace the cache with it.
    ///
    /// On failure the cache is left untouched. Returns the new task count.
    pub async fn reconcile_training_tasks(&self) -> Result<usize, ManagerError> {
        let upstream = self.training.list_tasks().await?;

        let mut tasks: Vec<TrainingTaskDetail> =
            upstream.into_values().map(TrainingTaskDetail::from).collect();
        tasks.sort_by(|a, b| {
            a.task_submit_time
                .total_cmp(&b.task_submit_time)
                .then_with(|| a.task_id.cmp(&b.task_id))
        });

        let count = tasks.len();
        *self.training_tasks.write().await = tasks;
        Ok(count)
    }

    // ---- inference ----

    pub async fn get_inference_instance_list(
        &self,
    ) -> Result<Vec<InferenceInstanceInfo>, ManagerError> {
        Ok(self.inference.list_instances().await?)
    }

    pub async fn get_inference_instance_log(&self, instance_id: &str) -> Result<String, ManagerError> {
        Ok(self.inference.get_instance_log(instance_id).await?)
    }

    /// Run a completion and return the generated text.
    pub async fn generate(&self, prompt: &str) -> Result<String, ManagerError> {
        let response = self.inference.generate(prompt).await?;
        response.into_text().ok_or_else(|| {
            ManagerError::Upstream(UpstreamError::Malformed(
                "generate returned no completions".to_string(),
            ))
        })
    }
}
