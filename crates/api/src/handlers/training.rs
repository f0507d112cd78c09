//! Handlers for the `/training` resource and the task summary view.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use ced_core::training::SubmitTaskRequest;
use ced_core::validation;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/training/task_list
///
/// The reconciled task cache; never polls the training service.
pub async fn list_tasks(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tasks = state.manager.get_training_task_list().await;
    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/v1/resources/task_sim_list
pub async fn list_task_summaries(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let summaries = state.manager.get_training_task_summaries().await;
    Ok(Json(DataResponse { data: summaries }))
}

/// POST /api/v1/training/task_submit
///
/// Submit a batch of tasks. Only an empty or oversized batch is refused
/// outright; otherwise each task's outcome, including validation
/// failures, is reported individually.
/// The response arrives after the last submission, so a batch of N tasks
/// takes at least `(N - 1)` pacing intervals.
pub async fn submit_tasks(
    State(state): State<AppState>,
    Json(requests): Json<Vec<SubmitTaskRequest>>,
) -> AppResult<impl IntoResponse> {
    validation::validate_submit_batch(&requests)?;

    tracing::info!(count = requests.len(), "Task batch received");
    let report = state.manager.submit_tasks(requests).await;

    Ok(Json(DataResponse { data: report }))
}

/// GET /api/v1/training/task_log/{task_id}
pub async fn get_task_log(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let log = state.manager.get_training_task_log(&task_id).await?;
    Ok(Json(DataResponse { data: log }))
}
