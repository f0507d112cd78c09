//! Inference service wire types.

use serde::{Deserialize, Serialize};

/// Load summary of one inference serving instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceInstanceInfo {
    pub instance_id: String,
    pub gpu_count: u32,
    pub request_count: u32,
    pub running_request_count: u32,
    pub waiting_request_count: u32,
    pub total_gpu_blocks_count: u64,
    pub used_gpu_blocks_count: u64,
    pub waiting_gpu_blocks_count: u64,
}

/// Body returned by the inference service's generate endpoint.
///
/// Depending on the serving backend it is either a bare string or an
/// object holding a list of completions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GenerateResponse {
    Structured { text: Vec<String> },
    Plain(String),
}

impl GenerateResponse {
    /// The generated text: the bare string, or the first completion.
    ///
    /// `None` when a structured response carries no completions.
    pub fn into_text(self) -> Option<String> {
        match self {
            GenerateResponse::Plain(text) => Some(text),
            GenerateResponse::Structured { text } => text.into_iter().next(),
        }
    }
}
