//! Training task types shared by the upstream client, the manager's task
//! cache, and the HTTP layer.
//!
//! Wire records (`TaskMeta`, `TaskRuntimeInfo`) mirror the training
//! service's JSON exactly. `TrainingTaskDetail` is the coordinator's own
//! projection and `TrainingTaskSummary` the list-view projection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::EpochSecs;

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Task lifecycle. The training service only ever moves a task forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Submitted,
    Pending,
    Ready,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskInstStatus {
    Pending,
    Ready,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskInstDataStatus {
    Pending,
    Running,
    Finished,
}

// ---------------------------------------------------------------------------
// Wire records
// ---------------------------------------------------------------------------

/// Task definition as sent to (and returned by) the training service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMeta {
    pub task_id: String,
    pub task_name: String,
    pub task_inst_num: u32,
    pub task_plan_cpu: f64,
    pub task_plan_mem: f64,
    pub task_plan_gpu: u32,
    pub task_status: TaskStatus,
    pub task_start_time: EpochSecs,
    /// GPU type name -> expected runtime in seconds on that GPU.
    pub task_runtime: BTreeMap<String, f64>,
}

/// Placement of one task instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInfo {
    pub inst_id: u32,
    pub gpu_id: String,
}

/// Task record returned by the training service's task listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRuntimeInfo {
    pub task_meta: TaskMeta,
    #[serde(default)]
    pub schedule_infos: BTreeMap<u32, ScheduleInfo>,
    #[serde(default)]
    pub inst_status: BTreeMap<u32, TaskInstStatus>,
    #[serde(default)]
    pub inst_data_status: BTreeMap<u32, TaskInstDataStatus>,
    pub task_submit_time: EpochSecs,
    pub task_start_time: EpochSecs,
    pub task_end_time: EpochSecs,
}

// ---------------------------------------------------------------------------
// Coordinator projections
// ---------------------------------------------------------------------------

/// Cached view of a training task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingTaskDetail {
    pub task_id: String,
    pub task_name: String,
    pub task_inst_num: u32,
    pub task_plan_cpu: f64,
    pub task_plan_mem: f64,
    pub task_plan_gpu: u32,
    pub task_status: TaskStatus,
    pub schedule_infos: BTreeMap<u32, ScheduleInfo>,
    pub inst_status: BTreeMap<u32, TaskInstStatus>,
    pub task_submit_time: EpochSecs,
    pub task_start_time: EpochSecs,
    pub task_end_time: EpochSecs,
}

impl From<TaskRuntimeInfo> for TrainingTaskDetail {
    fn from(info: TaskRuntimeInfo) -> Self {
        let meta = info.task_meta;
        Self {
            task_id: meta.task_id,
            task_name: meta.task_name,
            task_inst_num: meta.task_inst_num,
            task_plan_cpu: meta.task_plan_cpu,
            task_plan_mem: meta.task_plan_mem,
            task_plan_gpu: meta.task_plan_gpu,
            task_status: meta.task_status,
            schedule_infos: info.schedule_infos,
            inst_status: info.inst_status,
            task_submit_time: info.task_submit_time,
            task_start_time: info.task_start_time,
            task_end_time: info.task_end_time,
        }
    }
}

impl TrainingTaskDetail {
    /// Local placeholder for a task the training service just accepted.
    ///
    /// Replaced by the authoritative record on the next reconciliation.
    pub fn submitted(meta: &TaskMeta, submitted_at: EpochSecs) -> Self {
        Self {
            task_id: meta.task_id.clone(),
            task_name: meta.task_name.clone(),
            task_inst_num: meta.task_inst_num,
            task_plan_cpu: meta.task_plan_cpu,
            task_plan_mem: meta.task_plan_mem,
            task_plan_gpu: meta.task_plan_gpu,
            task_status: TaskStatus::Submitted,
            schedule_infos: BTreeMap::new(),
            inst_status: BTreeMap::new(),
            task_submit_time: submitted_at,
            task_start_time: meta.task_start_time,
            task_end_time: 0.0,
        }
    }

    /// Elapsed run time in seconds as of `now`.
    ///
    /// An end time earlier than the start time means the task has not
    /// finished, so the duration runs up to `now`.
    pub fn duration_secs(&self, now: EpochSecs) -> f64 {
        if self.task_end_time < self.task_start_time {
            (now - self.task_start_time).max(0.0)
        } else {
            self.task_end_time - self.task_start_time
        }
    }

    /// List-view projection with the duration evaluated at `now`.
    pub fn summary(&self, now: EpochSecs) -> TrainingTaskSummary {
        TrainingTaskSummary {
            id: self.task_id.clone(),
            name: self.task_name.clone(),
            status: self.task_status,
            start_time: self.task_start_time,
            duration_secs: self.duration_secs(now),
        }
    }
}

/// Compact task row for list views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingTaskSummary {
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    pub start_time: EpochSecs,
    pub duration_secs: f64,
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// One entry of a batch submission request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmitTaskRequest {
    pub task_name: String,
    #[serde(default)]
    pub task_image: String,
    pub inst_num: u32,
    pub plan_cpu: u32,
    pub plan_mem: u32,
    pub plan_gpu: u32,
    /// Expected runtime in seconds on the baseline GPU.
    pub runtime: u64,
    #[serde(default)]
    pub fs_files: Vec<String>,
}

/// Result of submitting one task of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionOutcome {
    pub task_id: String,
    pub task_name: String,
    pub accepted: bool,
    /// Upstream error message when `accepted` is false.
    pub error: Option<String>,
}

/// Per-task outcomes of a batch submission, in request order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubmissionReport {
    pub outcomes: Vec<SubmissionOutcome>,
}

impl SubmissionReport {
    pub fn accepted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.accepted).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.outcomes.len() - self.accepted_count()
    }
}

/// Raw log text per task instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskLog {
    pub task_id: String,
    pub logs: BTreeMap<u32, String>,
}
