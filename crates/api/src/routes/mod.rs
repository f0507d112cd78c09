pub mod health;
pub mod inference;
pub mod nodes;
pub mod resources;
pub mod training;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree served under the request timeout.
///
/// Route hierarchy:
///
/// ```text
/// /node/heartbeat                        report node snapshot (POST)
/// /node/{node_id}                        latest node snapshot (GET)
///
/// /resources/stats                       fleet totals + task summaries (GET)
/// /resources/node_stats                  node listing (?region=0..3) (GET)
/// /resources/task_sim_list               task summaries (GET)
///
/// /training/task_list                    cached task list (GET)
/// /training/task_submit                  paced batch submit (POST)
/// /training/task_log/{task_id}           per-instance logs (GET)
///
/// /inference/instance_list               serving instances (GET)
/// /inference/instance_log                instance log (?instance_id) (GET)
/// /inference/chat                        single completion (POST)
/// /inference/benchmark                   launch benchmark (POST)
/// /inference/benchmark/{id}/progress     benchmark progress (GET)
/// /inference/benchmark/{id}/result       benchmark result (GET)
/// /inference/benchmark_history           all benchmarks (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/node", nodes::router())
        .nest("/resources", resources::router())
        .nest("/training", training::router())
        .nest("/inference", inference::router())
}

/// The `/api/v1` routes that outlast the request timeout. Currently only
/// `/training/task_submit`.
pub fn paced_api_routes() -> Router<AppState> {
    Router::new().nest("/training", training::paced_router())
}
