//! Handlers for the `/inference` resource: instance views, chat, and
//! benchmarks.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ced_core::validation;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InstanceLogQuery {
    pub instance_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct BenchmarkRequest {
    pub num_prompts: u64,
    pub qps: f64,
}

#[derive(Debug, Serialize)]
pub struct BenchmarkCreated {
    pub benchmark_id: String,
}

// ---------------------------------------------------------------------------
// Instances
// ---------------------------------------------------------------------------

/// GET /api/v1/inference/instance_list
pub async fn list_instances(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let instances = state.manager.get_inference_instance_list().await?;
    Ok(Json(DataResponse { data: instances }))
}

/// GET /api/v1/inference/instance_log?instance_id=
pub async fn get_instance_log(
    State(state): State<AppState>,
    Query(params): Query<InstanceLogQuery>,
) -> AppResult<impl IntoResponse> {
    if params.instance_id.trim().is_empty() {
        return Err(AppError::BadRequest("instance_id must not be empty".into()));
    }

    let log = state
        .manager
        .get_inference_instance_log(&params.instance_id)
        .await?;
    Ok(Json(DataResponse { data: log }))
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// POST /api/v1/inference/chat
///
/// Forward one prompt to the inference service and return its completion.
pub async fn chat(
    State(state): State<AppState>,
    Json(input): Json<ChatRequest>,
) -> AppResult<impl IntoResponse> {
    validation::validate_prompt(&input.message)?;

    let response = state.manager.generate(&input.message).await?;
    Ok(Json(DataResponse {
        data: ChatResponse { response },
    }))
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// POST /api/v1/inference/benchmark
///
/// Launch a benchmark run. Returns 201 with the new run's id.
pub async fn submit_benchmark(
    State(state): State<AppState>,
    Json(input): Json<BenchmarkRequest>,
) -> AppResult<impl IntoResponse> {
    validation::validate_benchmark_params(input.num_prompts, input.qps)?;

    let benchmark_id = state
        .manager
        .submit_benchmark(input.num_prompts, input.qps)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: BenchmarkCreated { benchmark_id },
        }),
    ))
}

/// GET /api/v1/inference/benchmark/{id}/progress
///
/// 404 `NOT_READY` until the run has logged any progress.
pub async fn get_benchmark_progress(
    State(state): State<AppState>,
    Path(benchmark_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let progress = state.manager.get_benchmark_progress(&benchmark_id).await?;
    Ok(Json(DataResponse { data: progress }))
}

/// GET /api/v1/inference/benchmark/{id}/result
///
/// 404 `NOT_READY` until every result array has been logged.
pub async fn get_benchmark_result(
    State(state): State<AppState>,
    Path(benchmark_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let result = state.manager.get_benchmark_result(&benchmark_id).await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/inference/benchmark_history
pub async fn list_benchmark_history(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let history = state.manager.list_benchmark_history().await;
    Ok(Json(DataResponse { data: history }))
}
