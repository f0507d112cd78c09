//! Route definitions for the `/training` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::training;
use crate::state::AppState;

/// Routes mounted at `/training`.
///
/// ```text
/// GET    /task_list             -> list_tasks
/// GET    /task_log/{task_id}    -> get_task_log
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/task_list", get(training::list_tasks))
        .route("/task_log/{task_id}", get(training::get_task_log))
}

/// Paced routes mounted at `/training`. These run for as long as the
/// batch pacing demands and get their own timeout.
///
/// ```text
/// POST   /task_submit           -> submit_tasks
/// ```
pub fn paced_router() -> Router<AppState> {
    Router::new().route("/task_submit", post(training::submit_tasks))
}
