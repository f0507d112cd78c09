//! Inference benchmark runs and their history.

use ced_core::benchmark::{self, BenchmarkHistory, BenchmarkProgress, BenchmarkResult};
use chrono::Utc;

use crate::error::ManagerError;
use crate::manager::Manager;

impl Manager {
    /// Launch a benchmark on the inference service and record it.
    pub async fn submit_benchmark(&self, num_prompts: u64, qps: f64) -> Result<String, ManagerError> {
        let benchmark_id = self.inference.benchmark(num_prompts, qps).await?;

        self.benchmarks.write().await.push(BenchmarkHistory {
            benchmark_id: benchmark_id.clone(),
            submitted_at: Utc::now(),
            num_prompts,
            qps,
            result: None,
        });

        Ok(benchmark_id)
    }

    /// Current progress of a run, scraped from its log.
    ///
    /// Fails with `ParseIncomplete` until the log reports progress.
    pub async fn get_benchmark_progress(
        &self,
        benchmark_id: &str,
    ) -> Result<BenchmarkProgress, ManagerError> {
        let log = self.inference.benchmark_result(benchmark_id).await?;
        Ok(benchmark::parse_progress(&log)?)
    }

    /// Final per-request metrics of a run, scraped from its log.
    ///
    /// Fails with `ParseIncomplete` until every result array is logged.
    pub async fn get_benchmark_result(
        &self,
        benchmark_id: &str,
    ) -> Result<BenchmarkResult, ManagerError> {
        let log = self.inference.benchmark_result(benchmark_id).await?;
        let result = benchmark::parse_result(&log)?;
        self.store_result(benchmark_id, result.clone()).await;
        Ok(result)
    }

    /// Every recorded run, with results re-fetched from upstream.
    ///
    /// Runs whose results cannot be fetched or parsed keep whatever result
    /// they had before.
    pub async fn list_benchmark_history(&self) -> Vec<BenchmarkHistory> {
        let ids: Vec<String> = self
            .benchmarks
            .read()
            .await
            .iter()
            .map(|entry| entry.benchmark_id.clone())
            .collect();

        for id in &ids {
            let fetched = match self.inference.benchmark_result(id).await {
                Ok(log) => benchmark::parse_result(&log).map_err(ManagerError::from),
                Err(e) => Err(ManagerError::from(e)),
            };
            match fetched {
                Ok(result) => self.store_result(id, result).await,
                Err(e) => {
                    tracing::debug!(benchmark_id = %id, error = %e, "Benchmark result not refreshed");
                }
            }
        }

        self.benchmarks.read().await.clone()
    }

    async fn store_result(&self, benchmark_id: &str, result: BenchmarkResult) {
        let mut history = self.benchmarks.write().await;
        if let Some(entry) = history.iter_mut().find(|e| e.benchmark_id == benchmark_id) {
            entry.result = Some(result);
        }
    }
}
