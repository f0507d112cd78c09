use std::sync::Arc;

use ced_manager::Manager;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Fleet coordinator: node registry, task cache, upstream relay.
    pub manager: Arc<Manager>,
}
