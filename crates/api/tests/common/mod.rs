#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use ced_core::inference::{GenerateResponse, InferenceInstanceInfo};
use ced_core::training::{TaskMeta, TaskRuntimeInfo};
use ced_manager::{Manager, ManagerConfig};
use ced_upstream::{InferenceService, TrainingService, UpstreamError};
use http_body_util::BodyExt;
use tower::ServiceExt;

use ced_api::config::ServerConfig;
use ced_api::router::build_app_router;
use ced_api::state::AppState;

fn unavailable() -> UpstreamError {
    UpstreamError::Api {
        status: 503,
        body: "service unavailable".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Fake upstream services
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeTraining {
    pub tasks: Mutex<HashMap<String, TaskRuntimeInfo>>,
    pub submitted: Mutex<Vec<TaskMeta>>,
    pub logs: Mutex<HashMap<String, BTreeMap<u32, String>>>,
    pub down: AtomicBool,
}

#[async_trait]
impl TrainingService for FakeTraining {
    async fn list_tasks(&self) -> Result<HashMap<String, TaskRuntimeInfo>, UpstreamError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn submit_task(&self, task: &TaskMeta) -> Result<(), UpstreamError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.submitted.lock().unwrap().push(task.clone());
        Ok(())
    }

    async fn get_task_log(&self, task_id: &str) -> Result<BTreeMap<u32, String>, UpstreamError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self
            .logs
            .lock()
            .unwrap()
            .get(task_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeInference {
    pub instances: Mutex<Vec<InferenceInstanceInfo>>,
    pub benchmark_logs: Mutex<HashMap<String, String>>,
    pub down: AtomicBool,
}

impl FakeInference {
    pub fn set_log(&self, benchmark_id: &str, log: &str) {
        self.benchmark_logs
            .lock()
            .unwrap()
            .insert(benchmark_id.to_string(), log.to_string());
    }

    fn check_up(&self) -> Result<(), UpstreamError> {
        if self.down.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl InferenceService for FakeInference {
    async fn list_instances(&self) -> Result<Vec<InferenceInstanceInfo>, UpstreamError> {
        self.check_up()?;
        Ok(self.instances.lock().unwrap().clone())
    }

    async fn get_instance_log(&self, instance_id: &str) -> Result<String, UpstreamError> {
        self.check_up()?;
        Ok(format!("log of {instance_id}"))
    }

    async fn generate(&self, prompt: &str) -> Result<GenerateResponse, UpstreamError> {
        self.check_up()?;
        Ok(GenerateResponse::Structured {
            text: vec![format!("reply to {prompt}")],
        })
    }

    async fn benchmark(&self, num_prompts: u64, _qps: f64) -> Result<String, UpstreamError> {
        self.check_up()?;
        let id = "bench-1".to_string();
        self.set_log(&id, &format!("num_prompts={num_prompts}"));
        Ok(id)
    }

    async fn benchmark_result(&self, benchmark_id: &str) -> Result<String, UpstreamError> {
        self.check_up()?;
        Ok(self
            .benchmark_logs
            .lock()
            .unwrap()
            .get(benchmark_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Test app
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and fast manager timings.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        training_service_url: "http://127.0.0.1:1".to_string(),
        inference_service_url: "http://127.0.0.1:1".to_string(),
        upstream_timeout_secs: 1,
        manager: ManagerConfig {
            reconcile_interval: Duration::from_millis(50),
            submit_pacing: Duration::from_millis(10),
            node_stale_timeout: None,
            node_check_interval: Duration::from_millis(50),
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub manager: Arc<Manager>,
    pub training: Arc<FakeTraining>,
    pub inference: Arc<FakeInference>,
}

/// Build the full application router over fake upstreams.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack. No background daemon runs; tests drive
/// reconciliation explicitly through `manager`.
pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

/// Like [`build_test_app`] with a caller-supplied configuration.
pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let training = Arc::new(FakeTraining::default());
    let inference = Arc::new(FakeInference::default());
    let manager = Arc::new(Manager::new(
        config.manager.clone(),
        training.clone(),
        inference.clone(),
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        manager: Arc::clone(&manager),
    };

    TestApp {
        router: build_app_router(state, &config),
        manager,
        training,
        inference,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A heartbeat body as a worker agent would send it.
pub fn heartbeat_body(node_id: &str, region: u8, cpu: u64) -> serde_json::Value {
    serde_json::json!({
        "node_id": node_id,
        "node_ip": "10.0.0.7",
        "region": region,
        "node_type": "inference",
        "cpu_count": cpu,
        "gpu_count": 2,
        "memory_count": 64,
        "storage_count": 1024,
        "used_cpu_count": 1,
        "used_gpu_count": 1,
        "used_memory_count": 8,
        "used_storage_count": 100,
    })
}
