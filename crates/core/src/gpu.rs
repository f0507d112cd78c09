//! GPU performance table and runtime scaling.
//!
//! Users submit a single runtime estimate. The training service wants one
//! per GPU type, so the estimate is rescaled by relative throughput.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// GPU type whose throughput the submitted runtime estimate refers to.
pub const BASELINE_GPU: GpuType = GpuType::V100;

/// GPU models the training service schedules onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GpuType {
    V100,
    P100,
    T4,
}

impl GpuType {
    pub const ALL: [GpuType; 3] = [GpuType::V100, GpuType::P100, GpuType::T4];

    /// Relative throughput (FP32 TFLOPS-ish). Only ratios matter.
    pub fn performance(self) -> f64 {
        match self {
            GpuType::T4 => 8.1,
            GpuType::P100 => 9.3,
            GpuType::V100 => 15.7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GpuType::V100 => "V100",
            GpuType::P100 => "P100",
            GpuType::T4 => "T4",
        }
    }
}

/// Expand a baseline runtime into a runtime per GPU type.
///
/// Slower GPUs get proportionally longer runtimes:
/// `runtime * perf(BASELINE_GPU) / perf(gpu)`.
pub fn scale_runtime(runtime: f64) -> BTreeMap<String, f64> {
    let baseline = BASELINE_GPU.performance();
    GpuType::ALL
        .iter()
        .map(|gpu| {
            (
                gpu.as_str().to_string(),
                runtime * baseline / gpu.performance(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_gpu_keeps_the_original_runtime() {
        let scaled = scale_runtime(600.0);
        assert!((scaled[BASELINE_GPU.as_str()] - 600.0).abs() < 1e-9);
    }

    #[test]
    fn slower_gpus_get_longer_runtimes() {
        let scaled = scale_runtime(100.0);
        assert_eq!(scaled.len(), 3);
        assert!(scaled["T4"] > scaled["P100"]);
        assert!(scaled["P100"] > scaled["V100"]);
        assert!((scaled["T4"] - 100.0 * 15.7 / 8.1).abs() < 1e-9);
    }

    #[test]
    fn zero_runtime_stays_zero() {
        assert!(scale_runtime(0.0).values().all(|v| *v == 0.0));
    }
}
