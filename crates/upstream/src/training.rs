//! Training service client.
//!
//! The training service owns scheduling and execution of training tasks.
//! The coordinator only lists tasks, submits new ones, and reads logs.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use ced_core::training::{TaskMeta, TaskRuntimeInfo};
use serde::Serialize;

use crate::error::UpstreamError;
use crate::http;

/// Operations the coordinator needs from the training service.
#[async_trait]
pub trait TrainingService: Send + Sync {
    /// Every task the service knows about, keyed by task id.
    async fn list_tasks(&self) -> Result<HashMap<String, TaskRuntimeInfo>, UpstreamError>;

    /// Submit a new task. `Ok` means the service accepted it.
    async fn submit_task(&self, task: &TaskMeta) -> Result<(), UpstreamError>;

    /// Raw log text per instance of a task.
    async fn get_task_log(&self, task_id: &str) -> Result<BTreeMap<u32, String>, UpstreamError>;
}

/// HTTP client for the training service.
pub struct TrainingClient {
    client: reqwest::Client,
    base_url: String,
}

/// Body of `POST /api/task/submit`.
#[derive(Serialize)]
struct SubmitBody<'a> {
    task: &'a TaskMeta,
}

impl TrainingClient {
    /// Create a client for the service at `base_url` (e.g.
    /// `http://host:8001`). `timeout` bounds each request.
    pub fn new(base_url: String, timeout: Option<Duration>) -> Result<Self, UpstreamError> {
        Ok(Self::with_client(http::build_client(timeout)?, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: http::normalize_base_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TrainingService for TrainingClient {
    /// `POST /api/task/infos` with an empty object.
    async fn list_tasks(&self) -> Result<HashMap<String, TaskRuntimeInfo>, UpstreamError> {
        let response = self
            .client
            .post(http::endpoint(&self.base_url, &["api", "task", "infos"])?)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        http::parse_response(response).await
    }

    /// `POST /api/task/submit` with `{ "task": TaskMeta }`.
    async fn submit_task(&self, task: &TaskMeta) -> Result<(), UpstreamError> {
        let response = self
            .client
            .post(http::endpoint(&self.base_url, &["api", "task", "submit"])?)
            .json(&SubmitBody { task })
            .send()
            .await?;

        http::check_status(response).await?;

        tracing::debug!(task_id = %task.task_id, "Training service accepted task");
        Ok(())
    }

    /// `POST /api/task/log/{task_id}` with an empty object.
    async fn get_task_log(&self, task_id: &str) -> Result<BTreeMap<u32, String>, UpstreamError> {
        let response = self
            .client
            .post(http::endpoint(&self.base_url, &["api", "task", "log", task_id])?)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        http::parse_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped_from_base_url() {
        let client = TrainingClient::with_client(
            reqwest::Client::new(),
            "http://train:8001/".to_string(),
        );
        assert_eq!(client.base_url(), "http://train:8001");
    }

    #[tokio::test]
    async fn unreachable_service_is_a_request_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = TrainingClient::new(
            "http://127.0.0.1:9".to_string(),
            Some(Duration::from_secs(2)),
        )
        .unwrap();
        let err = client.list_tasks().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Request(_)));
    }
}
