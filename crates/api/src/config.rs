use std::time::Duration;

use ced_core::validation::MAX_SUBMIT_BATCH;
use ced_manager::ManagerConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on draining in-flight requests after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Base URL of the training service.
    pub training_service_url: String,
    /// Base URL of the inference service.
    pub inference_service_url: String,
    /// Per-request timeout for upstream calls in seconds (default: `60`).
    pub upstream_timeout_secs: u64,
    /// Manager and background daemon timings.
    pub manager: ManagerConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `8000`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                     |
    /// | `TRAINING_SERVICE_URL`  | `http://127.0.0.1:8001`  |
    /// | `INFERENCE_SERVICE_URL` | `http://127.0.0.1:8002`  |
    /// | `UPSTREAM_TIMEOUT_SECS` | `60`                     |
    ///
    /// Manager timings are read by [`ManagerConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let training_service_url = std::env::var("TRAINING_SERVICE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8001".into());

        let inference_service_url = std::env::var("INFERENCE_SERVICE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8002".into());

        let upstream_timeout_secs: u64 = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("UPSTREAM_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            training_service_url,
            inference_service_url,
            upstream_timeout_secs,
            manager: ManagerConfig::from_env(),
        }
    }

    /// Timeout for the paced batch submit route.
    ///
    /// A full batch sleeps `submit_pacing` between items and makes one
    /// upstream call per item, so the route gets that worst case on top of
    /// the normal request timeout. With upstream timeouts disabled each
    /// call is budgeted one request timeout.
    pub fn submit_timeout(&self) -> Duration {
        let request_timeout = Duration::from_secs(self.request_timeout_secs);
        let upstream_timeout = self.upstream_timeout().unwrap_or(request_timeout);
        let per_item = self.manager.submit_pacing + upstream_timeout;
        request_timeout + per_item * MAX_SUBMIT_BATCH as u32
    }

    /// Upstream request timeout, `None` when set to `0`.
    pub fn upstream_timeout(&self) -> Option<Duration> {
        (self.upstream_timeout_secs > 0).then(|| Duration::from_secs(self.upstream_timeout_secs))
    }
}
