//! Domain types and pure logic for the fleet coordinator.
//!
//! Nothing in this crate performs I/O. The manager and API crates build
//! on these types; the upstream clients use them as wire records.

pub mod benchmark;
pub mod error;
pub mod gpu;
pub mod inference;
pub mod node;
pub mod resources;
pub mod task_id;
pub mod training;
pub mod types;
pub mod validation;
