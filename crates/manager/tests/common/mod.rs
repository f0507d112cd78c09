#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use ced_core::inference::{GenerateResponse, InferenceInstanceInfo};
use ced_core::training::{SubmitTaskRequest, TaskMeta, TaskRuntimeInfo, TaskStatus};
use ced_manager::{Manager, ManagerConfig};
use ced_upstream::{InferenceService, TrainingService, UpstreamError};

pub fn unavailable() -> UpstreamError {
    UpstreamError::Api {
        status: 503,
        body: "service unavailable".to_string(),
    }
}

/// Timings short enough for tests; eviction disabled.
pub fn fast_config() -> ManagerConfig {
    ManagerConfig {
        reconcile_interval: Duration::from_millis(20),
        submit_pacing: Duration::from_millis(20),
        node_stale_timeout: None,
        node_check_interval: Duration::from_millis(20),
    }
}

pub fn runtime_info(id: &str, submit_time: f64, status: TaskStatus) -> TaskRuntimeInfo {
    TaskRuntimeInfo {
        task_meta: TaskMeta {
            task_id: id.to_string(),
            task_name: format!("task-{id}"),
            task_inst_num: 1,
            task_plan_cpu: 4.0,
            task_plan_mem: 16.0,
            task_plan_gpu: 1,
            task_status: status,
            task_start_time: submit_time,
            task_runtime: BTreeMap::new(),
        },
        schedule_infos: BTreeMap::new(),
        inst_status: BTreeMap::new(),
        inst_data_status: BTreeMap::new(),
        task_submit_time: submit_time,
        task_start_time: submit_time,
        task_end_time: 0.0,
    }
}

pub fn submit_request(name: &str) -> SubmitTaskRequest {
    SubmitTaskRequest {
        task_name: name.to_string(),
        task_image: "trainer:latest".to_string(),
        inst_num: 1,
        plan_cpu: 4,
        plan_mem: 16,
        plan_gpu: 1,
        runtime: 600,
        fs_files: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Training service fake
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeTraining {
    pub tasks: Mutex<HashMap<String, TaskRuntimeInfo>>,
    pub logs: Mutex<HashMap<String, BTreeMap<u32, String>>>,
    /// Task names whose submission is rejected.
    pub reject_names: Mutex<HashSet<String>>,
    pub submissions: Mutex<Vec<(TaskMeta, Instant)>>,
    pub fail_list: AtomicBool,
    pub list_calls: AtomicUsize,
}

impl FakeTraining {
    pub fn set_tasks(&self, tasks: Vec<TaskRuntimeInfo>) {
        let mut map = self.tasks.lock().unwrap();
        map.clear();
        for task in tasks {
            map.insert(task.task_meta.task_id.clone(), task);
        }
    }

    pub fn reject(&self, name: &str) {
        self.reject_names.lock().unwrap().insert(name.to_string());
    }

    pub fn submitted(&self) -> Vec<(TaskMeta, Instant)> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl TrainingService for FakeTraining {
    async fn list_tasks(&self) -> Result<HashMap<String, TaskRuntimeInfo>, UpstreamError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn submit_task(&self, task: &TaskMeta) -> Result<(), UpstreamError> {
        self.submissions
            .lock()
            .unwrap()
            .push((task.clone(), Instant::now()));
        if self.reject_names.lock().unwrap().contains(&task.task_name) {
            return Err(UpstreamError::Api {
                status: 400,
                body: format!("rejected {}", task.task_name),
            });
        }
        Ok(())
    }

    async fn get_task_log(&self, task_id: &str) -> Result<BTreeMap<u32, String>, UpstreamError> {
        self.logs
            .lock()
            .unwrap()
            .get(task_id)
            .cloned()
            .ok_or_else(|| UpstreamError::Api {
                status: 404,
                body: format!("no task {task_id}"),
            })
    }
}

// ---------------------------------------------------------------------------
// Inference service fake
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeInference {
    pub instances: Mutex<Vec<InferenceInstanceInfo>>,
    pub generate_response: Mutex<Option<GenerateResponse>>,
    pub prompts: Mutex<Vec<String>>,
    /// Benchmark id -> current log text.
    pub benchmark_logs: Mutex<HashMap<String, String>>,
    pub benchmark_calls: Mutex<Vec<(u64, f64)>>,
    pub next_benchmark: AtomicUsize,
    pub down: AtomicBool,
}

impl FakeInference {
    pub fn set_log(&self, benchmark_id: &str, log: &str) {
        self.benchmark_logs
            .lock()
            .unwrap()
            .insert(benchmark_id.to_string(), log.to_string());
    }

    fn check_up(&self) -> Result<(), UpstreamError> {
        if self.down.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl InferenceService for FakeInference {
    async fn list_instances(&self) -> Result<Vec<InferenceInstanceInfo>, UpstreamError> {
        self.check_up()?;
        Ok(self.instances.lock().unwrap().clone())
    }

    async fn get_instance_log(&self, instance_id: &str) -> Result<String, UpstreamError> {
        self.check_up()?;
        Ok(format!("log of {instance_id}"))
    }

    async fn generate(&self, prompt: &str) -> Result<GenerateResponse, UpstreamError> {
        self.check_up()?;
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self
            .generate_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| GenerateResponse::Plain(format!("echo: {prompt}"))))
    }

    async fn benchmark(&self, num_prompts: u64, qps: f64) -> Result<String, UpstreamError> {
        self.check_up()?;
        self.benchmark_calls.lock().unwrap().push((num_prompts, qps));
        let n = self.next_benchmark.fetch_add(1, Ordering::SeqCst);
        let id = format!("bench-{n}");
        self.set_log(&id, &format!("starting num_prompts={num_prompts}"));
        Ok(id)
    }

    async fn benchmark_result(&self, benchmark_id: &str) -> Result<String, UpstreamError> {
        self.check_up()?;
        self.benchmark_logs
            .lock()
            .unwrap()
            .get(benchmark_id)
            .cloned()
            .ok_or_else(|| UpstreamError::Api {
                status: 404,
                body: format!("no benchmark {benchmark_id}"),
            })
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub manager: Manager,
    pub training: Arc<FakeTraining>,
    pub inference: Arc<FakeInference>,
}

/// A manager wired to fresh fakes, without background daemons.
pub fn harness() -> Harness {
    harness_with(fast_config())
}

pub fn harness_with(config: ManagerConfig) -> Harness {
    let training = Arc::new(FakeTraining::default());
    let inference = Arc::new(FakeInference::default());
    let manager = Manager::new(config, training.clone(), inference.clone());
    Harness {
        manager,
        training,
        inference,
    }
}

/// Benchmark log text carrying every result array for three requests.
pub fn complete_result_log() -> String {
    [
        "num_prompts=3",
        "num_finished_requests: 3",
        "all_request_lens=[12, 30, 7]",
        "all_request_ids=['a', 'b', 'c']",
        "all_total_tokens=[112, 158, 71]",
        "all_prompt_lens=[12, 30, 7]",
        "all_response_lens=[100, 128, 64]",
        "all_e2e_latencies=[1.25, 2.5, 0.75]",
        "all_per_token_latencies=[0.0125, 0.0195, 0.0117]",
        "all_inference_latencies=[1.1, 2.3, 0.7]",
        "all_waiting_latencies=[0.15, 0.2, 0.05]",
        "all_decode_token_latencies=[0.011, 0.017, 0.01]",
    ]
    .join("\n")
}

pub struct StartedHarness {
    pub manager: Arc<Manager>,
    pub training: Arc<FakeTraining>,
    pub inference: Arc<FakeInference>,
}

/// A manager wired to fresh fakes with its background daemons running.
pub async fn started(config: ManagerConfig) -> StartedHarness {
    let training = Arc::new(FakeTraining::default());
    let inference = Arc::new(FakeInference::default());
    let manager = Manager::start(config, training.clone(), inference.clone()).await;
    StartedHarness {
        manager,
        training,
        inference,
    }
}
