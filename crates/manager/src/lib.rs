//! Fleet coordinator state and orchestration.
//!
//! [`Manager`](manager::Manager) owns the node registry, the training task
//! cache, and the benchmark history, and relays requests to the upstream
//! training and inference services. Background daemons (task
//! reconciliation, stale-node eviction) live in [`background`].

pub mod background;
mod benchmarks;
pub mod config;
pub mod error;
pub mod manager;
pub mod registry;
mod submission;

pub use config::ManagerConfig;
pub use error::ManagerError;
pub use manager::Manager;
pub use registry::NodeRegistry;
pub use submission::build_task_meta;
