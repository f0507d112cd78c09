use std::time::Duration;

/// Default interval between training task reconciliations.
const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 5;

/// Default pause between consecutive submissions in a batch.
const DEFAULT_SUBMIT_PACING_SECS: u64 = 3;

/// Default silence after which a node is dropped from the registry.
const DEFAULT_NODE_STALE_TIMEOUT_SECS: u64 = 120;

/// Default interval between stale-node sweeps.
const DEFAULT_NODE_CHECK_INTERVAL_SECS: u64 = 30;

/// Timing knobs for the manager and its background daemons.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// How often the task cache is refreshed from the training service.
    pub reconcile_interval: Duration,
    /// Pause between consecutive task submissions in one batch.
    pub submit_pacing: Duration,
    /// Nodes silent for longer than this are evicted. `None` keeps nodes
    /// forever.
    pub node_stale_timeout: Option<Duration>,
    /// How often the eviction sweep runs.
    pub node_check_interval: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            reconcile_interval: Duration::from_secs(DEFAULT_RECONCILE_INTERVAL_SECS),
            submit_pacing: Duration::from_secs(DEFAULT_SUBMIT_PACING_SECS),
            node_stale_timeout: Some(Duration::from_secs(DEFAULT_NODE_STALE_TIMEOUT_SECS)),
            node_check_interval: Duration::from_secs(DEFAULT_NODE_CHECK_INTERVAL_SECS),
        }
    }
}

impl ManagerConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    ///
    /// | Env Var                    | Default |
    /// |----------------------------|---------|
    /// | `RECONCILE_INTERVAL_SECS`  | `5`     |
    /// | `SUBMIT_PACING_SECS`       | `3`     |
    /// | `NODE_STALE_TIMEOUT_SECS`  | `120` (`0` disables eviction) |
    /// | `NODE_CHECK_INTERVAL_SECS` | `30`    |
    pub fn from_env() -> Self {
        let stale_secs = env_secs("NODE_STALE_TIMEOUT_SECS", DEFAULT_NODE_STALE_TIMEOUT_SECS);

        Self {
            reconcile_interval: Duration::from_secs(
                env_secs("RECONCILE_INTERVAL_SECS", DEFAULT_RECONCILE_INTERVAL_SECS).max(1),
            ),
            submit_pacing: Duration::from_secs(env_secs(
                "SUBMIT_PACING_SECS",
                DEFAULT_SUBMIT_PACING_SECS,
            )),
            node_stale_timeout: (stale_secs > 0).then(|| Duration::from_secs(stale_secs)),
            node_check_interval: Duration::from_secs(
                env_secs("NODE_CHECK_INTERVAL_SECS", DEFAULT_NODE_CHECK_INTERVAL_SECS).max(1),
            ),
        }
    }
}

fn env_secs(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
