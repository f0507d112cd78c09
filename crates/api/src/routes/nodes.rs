//! Route definitions for the `/node` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::nodes;
use crate::state::AppState;

/// Routes mounted at `/node`.
///
/// ```text
/// POST   /heartbeat       -> heartbeat
/// GET    /{node_id}       -> get_node
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/heartbeat", post(nodes::heartbeat))
        .route("/{node_id}", get(nodes::get_node))
}
