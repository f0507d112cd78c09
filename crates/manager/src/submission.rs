//! Paced batch submission of training tasks.

use ced_core::gpu;
use ced_core::task_id::generate_task_id;
use ced_core::training::{
    SubmissionOutcome, SubmissionReport, SubmitTaskRequest, TaskMeta, TaskStatus,
    TrainingTaskDetail,
};
use ced_core::types::{now_epoch_secs, EpochSecs};
use ced_core::validation;

use crate::manager::Manager;

/// Translate a submission request into the training service's task record.
pub fn build_task_meta(
    request: &SubmitTaskRequest,
    task_id: String,
    submitted_at: EpochSecs,
) -> TaskMeta {
    TaskMeta {
        task_id,
        task_name: request.task_name.clone(),
        task_inst_num: request.inst_num,
        task_plan_cpu: f64::from(request.plan_cpu),
        task_plan_mem: f64::from(request.plan_mem),
        task_plan_gpu: request.plan_gpu,
        task_status: TaskStatus::Submitted,
        task_start_time: submitted_at,
        task_runtime: gpu::scale_runtime(request.runtime as f64),
    }
}

impl Manager {
    /// Submit a batch of tasks one at a time.
    ///
    /// Between consecutive submissions the manager sleeps for the
    /// configured pacing delay, whatever the previous outcome, so the
    /// training service never sees a burst. No lock is held while
    /// sleeping. An invalid or rejected task is recorded in the report and
    /// the batch carries on.
    pub async fn submit_tasks(&self, requests: Vec<SubmitTaskRequest>) -> SubmissionReport {
        let mut report = SubmissionReport::default();

        for (index, request) in requests.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.config().submit_pacing).await;
            }

            let submitted_at = now_epoch_secs();
            let meta = build_task_meta(&request, generate_task_id(), submitted_at);

            if let Err(e) = validation::validate_submit_request(&request) {
                tracing::warn!(task_name = %meta.task_name, error = %e, "Training task rejected");
                report.outcomes.push(SubmissionOutcome {
                    task_id: meta.task_id,
                    task_name: meta.task_name,
                    accepted: false,
                    error: Some(e.to_string()),
                });
                continue;
            }

            let outcome = match self.training.submit_task(&meta).await {
                Ok(()) => {
                    tracing::info!(
                        task_id = %meta.task_id,
                        task_name = %meta.task_name,
                        image = %request.task_image,
                        "Training task submitted",
                    );
                    self.cache_submitted(&meta, submitted_at).await;
                    SubmissionOutcome {
                        task_id: meta.task_id,
                        task_name: meta.task_name,
                        accepted: true,
                        error: None,
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        task_id = %meta.task_id,
                        task_name = %meta.task_name,
                        error = %e,
                        "Training task submission failed",
                    );
                    SubmissionOutcome {
                        task_id: meta.task_id,
                        task_name: meta.task_name,
                        accepted: false,
                        error: Some(e.to_string()),
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        tracing::info!(
            accepted = report.accepted_count(),
            rejected = report.rejected_count(),
            "Submission batch finished",
        );
        report
    }

    /// Make an accepted task visible before the next reconciliation.
    async fn cache_submitted(&self, meta: &TaskMeta, submitted_at: EpochSecs) {
        let mut tasks = self.training_tasks.write().await;
        // A reconciliation may already have picked the task up.
        if tasks.iter().all(|t| t.task_id != meta.task_id) {
            tasks.push(TrainingTaskDetail::submitted(meta, submitted_at));
        }
    }
}
