//! Request validation applied at the HTTP boundary.

use crate::error::CoreError;
use crate::node::NodeResourceStats;
use crate::training::SubmitTaskRequest;

/// Maximum length of a node id or task name.
const MAX_NAME_LEN: usize = 128;

/// Maximum number of tasks accepted in one submission batch.
pub const MAX_SUBMIT_BATCH: usize = 64;

/// Maximum prompt length in characters for generation requests.
pub const MAX_PROMPT_LENGTH: usize = 32_000;

/// Maximum number of prompts in a single benchmark run.
pub const MAX_BENCHMARK_PROMPTS: u64 = 100_000;

/// Validate a heartbeat snapshot.
pub fn validate_node_stats(stats: &NodeResourceStats) -> Result<(), CoreError> {
    if stats.node_id.trim().is_empty() {
        return Err(CoreError::Validation("node_id must not be empty".to_string()));
    }
    if stats.node_id.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "node_id must not exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate the shape of a task submission batch.
///
/// Individual tasks are checked with [`validate_submit_request`] as the
/// batch is processed, so one bad task does not sink the others.
pub fn validate_submit_batch(requests: &[SubmitTaskRequest]) -> Result<(), CoreError> {
    if requests.is_empty() {
        return Err(CoreError::Validation(
            "At least one task must be submitted".to_string(),
        ));
    }
    if requests.len() > MAX_SUBMIT_BATCH {
        return Err(CoreError::Validation(format!(
            "A batch may contain at most {MAX_SUBMIT_BATCH} tasks"
        )));
    }
    Ok(())
}

/// Validate a single task submission.
pub fn validate_submit_request(req: &SubmitTaskRequest) -> Result<(), CoreError> {
    if req.task_name.trim().is_empty() {
        return Err(CoreError::Validation("task_name must not be empty".to_string()));
    }
    if req.task_name.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "task_name must not exceed {MAX_NAME_LEN} characters"
        )));
    }
    if req.inst_num == 0 {
        return Err(CoreError::Validation("inst_num must be at least 1".to_string()));
    }
    if req.runtime == 0 {
        return Err(CoreError::Validation("runtime must be positive".to_string()));
    }
    Ok(())
}

/// Validate benchmark launch parameters.
pub fn validate_benchmark_params(num_prompts: u64, qps: f64) -> Result<(), CoreError> {
    if num_prompts == 0 || num_prompts > MAX_BENCHMARK_PROMPTS {
        return Err(CoreError::Validation(format!(
            "num_prompts must be between 1 and {MAX_BENCHMARK_PROMPTS}"
        )));
    }
    if !qps.is_finite() || qps <= 0.0 {
        return Err(CoreError::Validation("qps must be a positive number".to_string()));
    }
    Ok(())
}

/// Validate a generation prompt: non-empty and within the length limit.
pub fn validate_prompt(prompt: &str) -> Result<(), CoreError> {
    if prompt.trim().is_empty() {
        return Err(CoreError::Validation("Prompt must not be empty".to_string()));
    }
    if prompt.chars().count() > MAX_PROMPT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Prompt exceeds maximum length of {MAX_PROMPT_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request(name: &str, inst_num: u32, runtime: u64) -> SubmitTaskRequest {
        SubmitTaskRequest {
            task_name: name.to_string(),
            task_image: "pytorch:2.3".to_string(),
            inst_num,
            plan_cpu: 4,
            plan_mem: 16,
            plan_gpu: 1,
            runtime,
            fs_files: Vec::new(),
        }
    }

    #[test]
    fn valid_batch_passes() {
        assert!(validate_submit_batch(&[request("a", 1, 60), request("b", 2, 30)]).is_ok());
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert_matches!(validate_submit_batch(&[]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn oversized_batch_is_rejected() {
        let batch = vec![request("a", 1, 60); MAX_SUBMIT_BATCH + 1];
        assert_matches!(validate_submit_batch(&batch), Err(CoreError::Validation(_)));
    }

    #[test]
    fn blank_task_name_is_rejected() {
        assert_matches!(
            validate_submit_request(&request("  ", 1, 60)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn zero_instances_or_runtime_are_rejected() {
        assert!(validate_submit_request(&request("a", 0, 60)).is_err());
        assert!(validate_submit_request(&request("a", 1, 0)).is_err());
    }

    #[test]
    fn benchmark_params_must_be_positive() {
        assert!(validate_benchmark_params(10, 2.0).is_ok());
        assert!(validate_benchmark_params(0, 2.0).is_err());
        assert!(validate_benchmark_params(10, 0.0).is_err());
        assert!(validate_benchmark_params(10, f64::NAN).is_err());
    }

    #[test]
    fn blank_prompt_is_rejected() {
        assert!(validate_prompt("   ").is_err());
        assert!(validate_prompt("hello").is_ok());
    }
}
