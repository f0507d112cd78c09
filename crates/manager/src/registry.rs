//! In-memory registry of the latest resource snapshot per worker node.
//!
//! A single [`RwLock`] guards the map. Heartbeats take the write side;
//! listings and aggregation take the read side, so an aggregate is always
//! computed over one consistent set of snapshots.

use std::collections::HashMap;
use std::time::Duration;

use ced_core::error::CoreError;
use ced_core::node::{NodeResourceStats, Region};
use ced_core::resources::{self, ResourceStats};
use tokio::sync::RwLock;
use tokio::time::Instant;

struct NodeEntry {
    stats: NodeResourceStats,
    last_heartbeat: Instant,
}

/// Latest [`NodeResourceStats`] per node id.
#[derive(Default)]
pub struct NodeRegistry {
    nodes: RwLock<HashMap<String, NodeEntry>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `stats` as the node's snapshot, replacing any previous one
    /// wholesale, and stamp the heartbeat time.
    pub async fn upsert(&self, node_id: &str, stats: NodeResourceStats) {
        let entry = NodeEntry {
            stats,
            last_heartbeat: Instant::now(),
        };
        let previous = self.nodes.write().await.insert(node_id.to_string(), entry);
        if previous.is_none() {
            tracing::info!(node_id = %node_id, "Node registered");
        }
    }

    /// Snapshot of one node.
    pub async fn get(&self, node_id: &str) -> Result<NodeResourceStats, CoreError> {
        self.nodes
            .read()
            .await
            .get(node_id)
            .map(|entry| entry.stats.clone())
            .ok_or_else(|| CoreError::NotFound {
                entity: "Node",
                id: node_id.to_string(),
            })
    }

    /// Copies of every snapshot, ordered by node id.
    pub async fn list_all(&self) -> Vec<NodeResourceStats> {
        let nodes = self.nodes.read().await;
        sorted(nodes.values().map(|entry| entry.stats.clone()).collect())
    }

    /// Copies of the snapshots in one region, ordered by node id.
    pub async fn list_by_region(&self, region: Region) -> Vec<NodeResourceStats> {
        let nodes = self.nodes.read().await;
        sorted(
            nodes
                .values()
                .filter(|entry| entry.stats.region == region)
                .map(|entry| entry.stats.clone())
                .collect(),
        )
    }

    /// Fleet-wide totals, computed in one pass under the read lock.
    pub async fn aggregate(&self) -> ResourceStats {
        let nodes = self.nodes.read().await;
        resources::aggregate(nodes.values().map(|entry| &entry.stats))
    }

    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }

    /// Drop every node whose last heartbeat is older than `max_age`.
    ///
    /// Returns the evicted node ids.
    pub async fn evict_stale(&self, max_age: Duration) -> Vec<String> {
        let now = Instant::now();
        let mut nodes = self.nodes.write().await;

        let stale: Vec<String> = nodes
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.last_heartbeat) > max_age)
            .map(|(id, _)| id.clone())
            .collect();

        for id in &stale {
            nodes.remove(id);
        }
        stale
    }
}

fn sorted(mut stats: Vec<NodeResourceStats>) -> Vec<NodeResourceStats> {
    stats.sort_by(|a, b| a.node_id.cmp(&b.node_id));
    stats
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ced_core::node::NodeRole;

    fn stats(id: &str, region: Region, cpu: u64) -> NodeResourceStats {
        NodeResourceStats {
            node_id: id.to_string(),
            node_ip: "10.0.0.1".to_string(),
            region,
            node_type: NodeRole::Inference,
            cpu_count: cpu,
            gpu_count: 1,
            memory_count: 32,
            storage_count: 256,
            used_cpu_count: cpu / 2,
            used_gpu_count: 0,
            used_memory_count: 8,
            used_storage_count: 64,
            gpu_info: Vec::new(),
        }
    }

    #[tokio::test]
    async fn get_unknown_node_is_not_found() {
        let registry = NodeRegistry::new();
        assert_matches!(
            registry.get("ghost").await,
            Err(CoreError::NotFound { entity: "Node", .. })
        );
    }

    #[tokio::test]
    async fn upsert_replaces_the_whole_snapshot() {
        let registry = NodeRegistry::new();
        registry.upsert("n1", stats("n1", Region::Cloud, 8)).await;
        registry.upsert("n1", stats("n1", Region::Edge, 16)).await;

        let node = registry.get("n1").await.unwrap();
        assert_eq!(node.region, Region::Edge);
        assert_eq!(node.cpu_count, 16);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn aggregate_counts_latest_snapshot_per_node() {
        let registry = NodeRegistry::new();
        registry.upsert("a", stats("a", Region::Cloud, 8)).await;
        registry.upsert("b", stats("b", Region::Edge, 4)).await;
        registry.upsert("a", stats("a", Region::Cloud, 32)).await;

        let totals = registry.aggregate().await;
        assert_eq!(totals.total_cpu_count, 36);
        assert_eq!(totals.node_count(), 2);
    }

    #[tokio::test]
    async fn region_lists_partition_the_full_list() {
        let registry = NodeRegistry::new();
        let layout = [
            ("c1", Region::Cloud),
            ("c2", Region::Cloud),
            ("e1", Region::Edge),
            ("d1", Region::Device),
            ("d2", Region::Device),
            ("d3", Region::Device),
        ];
        for (id, region) in layout {
            registry.upsert(id, stats(id, region, 4)).await;
        }

        let all = registry.list_all().await;
        let mut regional_total = 0;
        for region in Region::ALL {
            let subset = registry.list_by_region(region).await;
            assert!(subset.iter().all(|n| n.region == region));
            assert!(subset.iter().all(|n| all.contains(n)));
            regional_total += subset.len();
        }
        assert_eq!(regional_total, all.len());
        assert_eq!(registry.list_by_region(Region::Device).await.len(), 3);
    }

    #[tokio::test]
    async fn list_all_is_ordered_by_node_id() {
        let registry = NodeRegistry::new();
        for id in ["zeta", "alpha", "mu"] {
            registry.upsert(id, stats(id, Region::Cloud, 1)).await;
        }
        let ids: Vec<String> = registry.list_all().await.into_iter().map(|n| n.node_id).collect();
        assert_eq!(ids, vec!["alpha", "mu", "zeta"]);
    }

    #[tokio::test]
    async fn evict_stale_drops_only_silent_nodes() {
        let registry = NodeRegistry::new();
        registry.upsert("old", stats("old", Region::Cloud, 1)).await;
        tokio::time::sleep(Duration::from_millis(80)).await;
        registry.upsert("fresh", stats("fresh", Region::Cloud, 1)).await;

        let evicted = registry.evict_stale(Duration::from_millis(40)).await;
        assert_eq!(evicted, vec!["old".to_string()]);
        assert!(registry.get("fresh").await.is_ok());
        assert!(registry.get("old").await.is_err());
    }

    #[tokio::test]
    async fn concurrent_heartbeats_all_land() {
        let registry = std::sync::Arc::new(NodeRegistry::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let registry = std::sync::Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                let id = format!("node-{i}");
                registry.upsert(&id, stats(&id, Region::Edge, 2)).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        let totals = registry.aggregate().await;
        assert_eq!(totals.edge_node_count, 32);
        assert_eq!(totals.total_cpu_count, 64);
    }
}
