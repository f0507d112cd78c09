//! Background daemons owned by the [`Manager`](crate::Manager).
//!
//! Each submodule provides a long-running async function spawned by
//! [`Manager::start`](crate::Manager::start). All daemons accept a
//! [`CancellationToken`](tokio_util::sync::CancellationToken) and return
//! once it is cancelled.

pub mod node_eviction;
pub mod reconcile;
