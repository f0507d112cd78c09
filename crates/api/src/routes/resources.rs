//! Route definitions for the `/resources` views.

use axum::routing::get;
use axum::Router;

use crate::handlers::{nodes, training};
use crate::state::AppState;

/// Routes mounted at `/resources`.
///
/// ```text
/// GET    /stats           -> nodes::resource_overview
/// GET    /node_stats      -> nodes::list_nodes
/// GET    /task_sim_list   -> training::list_task_summaries
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(nodes::resource_overview))
        .route("/node_stats", get(nodes::list_nodes))
        .route("/task_sim_list", get(training::list_task_summaries))
}
