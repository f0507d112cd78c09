use ced_core::error::CoreError;
use ced_upstream::UpstreamError;

/// Errors returned by [`Manager`](crate::Manager) operations.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// Lookup miss or incomplete benchmark output.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An upstream service call failed.
    #[error("Upstream service unavailable: {0}")]
    Upstream(#[from] UpstreamError),
}
