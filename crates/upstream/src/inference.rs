//! Inference service client.
//!
//! Every call is a live pass-through; nothing here caches.

use std::time::Duration;

use async_trait::async_trait;
use ced_core::inference::{GenerateResponse, InferenceInstanceInfo};
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;
use crate::http;

/// Sampling parameters sent with every generate request.
const GENERATE_TEMPERATURE: f64 = 0.7;
const GENERATE_TOP_P: f64 = 0.9;
const GENERATE_MAX_TOKENS: u32 = 512;

/// Operations the coordinator needs from the inference service.
#[async_trait]
pub trait InferenceService: Send + Sync {
    async fn list_instances(&self) -> Result<Vec<InferenceInstanceInfo>, UpstreamError>;

    async fn get_instance_log(&self, instance_id: &str) -> Result<String, UpstreamError>;

    /// Run a single non-streaming completion.
    async fn generate(&self, prompt: &str) -> Result<GenerateResponse, UpstreamError>;

    /// Launch a benchmark run and return its id.
    async fn benchmark(&self, num_prompts: u64, qps: f64) -> Result<String, UpstreamError>;

    /// Raw benchmark log text for a run.
    async fn benchmark_result(&self, benchmark_id: &str) -> Result<String, UpstreamError>;
}

/// HTTP client for the inference service.
pub struct InferenceClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    prompt: &'a str,
    stream: bool,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct BenchmarkBody {
    num_prompts: u64,
    qps: f64,
}

#[derive(Deserialize)]
struct BenchmarkLaunch {
    benchmark_id: String,
}

impl InferenceClient {
    /// Create a client for the service at `base_url` (e.g.
    /// `http://host:8002`). `timeout` bounds each request.
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
impl InferenceService for InferenceClient {
    /// `GET /instance_list`.
    async fn list_instances(&self) -> Result<Vec<InferenceInstanceInfo>, UpstreamError> {
        let response = self
            .client
            .get(http::endpoint(&self.base_url, &["instance_list"])?)
            .send()
            .await?;

        http::parse_data(response).await
    }

    /// `GET /instance_log/{instance_id}`.
    async fn get_instance_log(&self, instance_id: &str) -> Result<String, UpstreamError> {
        let response = self
            .client
            .get(http::endpoint(&self.base_url, &["instance_log", instance_id])?)
            .send()
            .await?;

        http::parse_data(response).await
    }

    /// `POST /generate`.
    async fn generate(&self, prompt: &str) -> Result<GenerateResponse, UpstreamError> {
        let body = GenerateBody {
            prompt,
            stream: false,
            temperature: GENERATE_TEMPERATURE,
            top_p: GENERATE_TOP_P,
            max_tokens: GENERATE_MAX_TOKENS,
        };

        let response = self
            .client
            .post(http::endpoint(&self.base_url, &["generate"])?)
            .json(&body)
            .send()
            .await?;

        http::parse_response(response).await
    }

    /// `POST /benchmark`.
    async fn benchmark(&self, num_prompts: u64, qps: f64) -> Result<String, UpstreamError> {
        let response = self
            .client
            .post(http::endpoint(&self.base_url, &["benchmark"])?)
            .json(&BenchmarkBody { num_prompts, qps })
            .send()
            .await?;

        let launch: BenchmarkLaunch = http::parse_data(response).await?;
        if launch.benchmark_id.is_empty() {
            return Err(UpstreamError::Malformed(
                "benchmark launch returned an empty benchmark_id".to_string(),
            ));
        }

        tracing::info!(benchmark_id = %launch.benchmark_id, num_prompts, qps, "Benchmark launched");
        Ok(launch.benchmark_id)
    }

    /// `GET /benchmark_result/{benchmark_id}`.
    async fn benchmark_result(&self, benchmark_id: &str) -> Result<String, UpstreamError> {
        let response = self
            .client
            .get(http::endpoint(&self.base_url, &["benchmark_result", benchmark_id])?)
            .send()
            .await?;

        http::parse_data(response).await
    }
}
