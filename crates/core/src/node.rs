//! Worker node identity and resource snapshot types.
//!
//! A [`NodeResourceStats`] is what a worker pushes on every heartbeat. The
//! coordinator stores the latest one per `node_id` and never merges
//! snapshots field by field.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// Wire code meaning "every region" in list filters.
pub const REGION_CODE_ALL: u8 = 0;

/// Fleet tier a node belongs to.
///
/// Serialized as its integer code (`1`, `2`, `3`), which is what workers
/// send in heartbeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Region {
    Cloud,
    Edge,
    Device,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Cloud, Region::Edge, Region::Device];

    pub fn code(self) -> u8 {
        match self {
            Region::Cloud => 1,
            Region::Edge => 2,
            Region::Device => 3,
        }
    }
}

impl TryFrom<u8> for Region {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Region::Cloud),
            2 => Ok(Region::Edge),
            3 => Ok(Region::Device),
            other => Err(CoreError::Validation(format!(
                "Unknown region code {other} (expected 1, 2 or 3)"
            ))),
        }
    }
}

impl From<Region> for u8 {
    fn from(region: Region) -> Self {
        region.code()
    }
}

/// Region selector used by node listing queries. Code `0` selects all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionFilter {
    All,
    Only(Region),
}

impl TryFrom<u8> for RegionFilter {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        if code == REGION_CODE_ALL {
            return Ok(RegionFilter::All);
        }
        Region::try_from(code).map(RegionFilter::Only)
    }
}

// ---------------------------------------------------------------------------
// Node role
// ---------------------------------------------------------------------------

/// Workload a node is dedicated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    // Older workers report the role in Chinese.
    #[serde(alias = "训练")]
    Training,
    #[serde(alias = "推理")]
    Inference,
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// One GPU on a worker node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuInfo {
    pub gpu_id: String,
    pub gpu_type: String,
    /// MB.
    pub gpu_memory_total: u64,
    /// MB.
    pub gpu_memory_used: u64,
    /// Percent, `0.0..=100.0`.
    pub gpu_utilization: f64,
}

/// Latest resource snapshot reported by a worker.
///
/// Memory and storage counts are in GB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResourceStats {
    pub node_id: String,
    pub node_ip: String,
    pub region: Region,
    pub node_type: NodeRole,
    pub cpu_count: u64,
    pub gpu_count: u64,
    pub memory_count: u64,
    pub storage_count: u64,
    pub used_cpu_count: u64,
    pub used_gpu_count: u64,
    pub used_memory_count: u64,
    pub used_storage_count: u64,
    #[serde(default)]
    pub gpu_info: Vec<GpuInfo>,
}
