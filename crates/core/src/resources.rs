//! Fleet-wide resource aggregation.
//!
//! Pure logic. The registry calls [`aggregate`] while it holds its read
//! lock so every field of the result describes the same instant.

use serde::Serialize;

use crate::node::{NodeResourceStats, Region};
use crate::training::TrainingTaskSummary;

/// Summed resources across every registered node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceStats {
    pub cloud_node_count: u64,
    pub edge_node_count: u64,
    pub device_node_count: u64,
    pub total_cpu_count: u64,
    pub used_cpu_count: u64,
    pub total_gpu_count: u64,
    pub used_gpu_count: u64,
    pub total_memory_count: u64,
    pub used_memory_count: u64,
    pub total_storage_count: u64,
    pub used_storage_count: u64,
}

impl ResourceStats {
    /// Number of nodes counted, across all regions.
    pub fn node_count(&self) -> u64 {
        self.cloud_node_count + self.edge_node_count + self.device_node_count
    }
}

/// Dashboard view: node resources plus the cached training workload.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceOverview {
    #[serde(flatten)]
    pub resources: ResourceStats,
    pub training_task_count: usize,
    pub training_tasks: Vec<TrainingTaskSummary>,
}

/// Fold node snapshots into a [`ResourceStats`] in a single pass.
///
/// Counts are reported by workers, so sums saturate at `u64::MAX` instead
/// of overflowing.
pub fn aggregate<'a, I>(nodes: I) -> ResourceStats
where
    I: IntoIterator<Item = &'a NodeResourceStats>,
{
    nodes.into_iter().fold(ResourceStats::default(), |mut acc, node| {
        match node.region {
            Region::Cloud => acc.cloud_node_count += 1,
            Region::Edge => acc.edge_node_count += 1,
            Region::Device => acc.device_node_count += 1,
        }
        acc.total_cpu_count = acc.total_cpu_count.saturating_add(node.cpu_count);
        acc.used_cpu_count = acc.used_cpu_count.saturating_add(node.used_cpu_count);
        acc.total_gpu_count = acc.total_gpu_count.saturating_add(node.gpu_count);
        acc.used_gpu_count = acc.used_gpu_count.saturating_add(node.used_gpu_count);
        acc.total_memory_count = acc.total_memory_count.saturating_add(node.memory_count);
        acc.used_memory_count = acc.used_memory_count.saturating_add(node.used_memory_count);
        acc.total_storage_count = acc.total_storage_count.saturating_add(node.storage_count);
        acc.used_storage_count = acc.used_storage_count.saturating_add(node.used_storage_count);
        acc
    })
}
