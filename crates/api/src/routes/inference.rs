//! Route definitions for the `/inference` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::inference;
use crate::state::AppState;

/// Routes mounted at `/inference`.
///
/// ```text
/// GET    /instance_list               -> list_instances
/// GET    /instance_log                -> get_instance_log
/// POST   /chat                        -> chat
/// POST   /benchmark                   -> submit_benchmark
/// GET    /benchmark/{id}/progress     -> get_benchmark_progress
/// GET    /benchmark/{id}/result       -> get_benchmark_result
/// GET    /benchmark_history           -> list_benchmark_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/instance_list", get(inference::list_instances))
        .route("/instance_log", get(inference::get_instance_log))
        .route("/chat", post(inference::chat))
        .route("/benchmark", post(inference::submit_benchmark))
        .route("/benchmark/{id}/progress", get(inference::get_benchmark_progress))
        .route("/benchmark/{id}/result", get(inference::get_benchmark_result))
        .route("/benchmark_history", get(inference::list_benchmark_history))
}
