//! HTTP clients for the upstream training and inference services.
//!
//! Each service is reached through a trait ([`TrainingService`],
//! [`InferenceService`]) so the manager can be driven by in-process fakes
//! in tests. The reqwest-backed implementations are [`TrainingClient`]
//! and [`InferenceClient`].

pub mod error;
mod http;
pub mod inference;
pub mod training;

pub use error::UpstreamError;
pub use inference::{InferenceClient, InferenceService};
pub use training::{TrainingClient, TrainingService};
