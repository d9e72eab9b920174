//! # Enrichment and Aggregate Statistics
//!
//! Merges per-node inputs by position:
//!
//! ```text
//! nodes[i] ─┬─ samples[i]    (always present)
//!           ├─ anomalies[i]  (may be missing → Healthy, no score)
//!           └─ rewards[i]    (may be missing → 0.0)
//!           ▼
//!      enriched[i]
//! ```
//!
//! The anomaly service returns no node identifiers, so position is the only
//! link between a node and its classification.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use pnode_common::{AnomalyResult, AnomalyStatus, EnrichedNode, NodeRecord};

use crate::metrics::MetricsSample;

/// Shown as the epoch count when no node carries a timestamp.
pub const EPOCH_PLACEHOLDER: usize = 1342;

/// GB per TB for the capacity tile.
pub const GB_PER_TB: f64 = 1024.0;

/// Merges nodes with their samples, anomaly results and rewards.
///
/// Output length equals `nodes.len()`. `samples` must have one entry per
/// node; shorter `anomalies` or `rewards` fall back to defaults.
pub fn merge_enriched(
    nodes: Vec<NodeRecord>,
    samples: &[MetricsSample],
    anomalies: &[AnomalyResult],
    rewards: &[f64],
) -> Vec<EnrichedNode> {
    debug_assert_eq!(nodes.len(), samples.len());

    nodes
        .into_iter()
        .zip(samples.iter())
        .enumerate()
        .map(|(i, (node, sample))| {
            let (anomaly_status, anomaly_score) = match anomalies.get(i) {
                Some(a) => (a.status, Some(a.anomaly_score)),
                None => (AnomalyStatus::Healthy, None),
            };
            EnrichedNode {
                node,
                anomaly_status,
                anomaly_score,
                projected_reward: rewards.get(i).copied().unwrap_or(0.0),
                storage_used: sample.metrics.storage_used_gb,
                timestamp: sample.timestamp,
            }
        })
        .collect()
}

/// Figures shown in the stat tiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub node_count: usize,
    /// `Σ storage_used / 1024`.
    pub total_storage_tb: f64,
    pub epoch_count: usize,
    pub risk_count: usize,
}

impl DashboardStats {
    pub fn compute(nodes: &[EnrichedNode]) -> Self {
        Self {
            node_count: nodes.len(),
            total_storage_tb: total_storage_tb(nodes),
            epoch_count: epoch_count(nodes),
            risk_count: nodes.iter().filter(|n| n.anomaly_status.is_risk()).count(),
        }
    }
}

pub fn total_storage_tb(nodes: &[EnrichedNode]) -> f64 {
    nodes.iter().map(|n| n.storage_used).sum::<f64>() / GB_PER_TB
}

/// Distinct timestamps across nodes, or [`EPOCH_PLACEHOLDER`] if there are none.
pub fn epoch_count(nodes: &[EnrichedNode]) -> usize {
    let distinct: BTreeSet<u64> = nodes.iter().filter_map(|n| n.timestamp).collect();
    if distinct.is_empty() {
        EPOCH_PLACEHOLDER
    } else {
        distinct.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnode_common::SyntheticMetrics;

    fn sample(storage: f64, timestamp: Option<u64>) -> MetricsSample {
        MetricsSample {
            metrics: SyntheticMetrics {
                uptime_score: 0.95,
                storage_used_gb: storage,
                latency_ms: 40.0,
            },
            timestamp,
        }
    }

    fn nodes(n: usize) -> Vec<NodeRecord> {
        (0..n).map(|i| NodeRecord::with_pubkey(format!("pk{}", i))).collect()
    }

    fn risk(score: f64) -> AnomalyResult {
        AnomalyResult {
            status: AnomalyStatus::Risk,
            anomaly_score: score,
        }
    }

    #[test]
    fn test_merge_aligned_inputs() {
        let samples = vec![sample(500.0, None), sample(650.0, None)];
        let anomalies = vec![risk(-0.4), risk(-0.1)];
        let merged = merge_enriched(nodes(2), &samples, &anomalies, &[2.5, 3.5]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].node.pubkey, "pk0");
        assert_eq!(merged[0].anomaly_status, AnomalyStatus::Risk);
        assert_eq!(merged[0].anomaly_score, Some(-0.4));
        assert_eq!(merged[1].projected_reward, 3.5);
        assert_eq!(merged[1].storage_used, 650.0);
    }

    #[test]
    fn test_short_anomalies_default_to_healthy() {
        let samples = vec![sample(500.0, None); 3];
        let merged = merge_enriched(nodes(3), &samples, &[risk(-0.3)], &[1.0, 1.0, 1.0]);

        assert_eq!(merged[0].anomaly_status, AnomalyStatus::Risk);
        for node in &merged[1..] {
            assert_eq!(node.anomaly_status, AnomalyStatus::Healthy);
            assert_eq!(node.anomaly_score, None);
        }
    }

    #[test]
    fn test_no_anomalies_all_healthy() {
        let samples = vec![sample(500.0, None); 2];
        let merged = merge_enriched(nodes(2), &samples, &[], &[1.0, 1.0]);
        assert!(merged
            .iter()
            .all(|n| n.anomaly_status == AnomalyStatus::Healthy && n.anomaly_score.is_none()));
    }

    #[test]
    fn test_missing_reward_defaults_to_zero() {
        let samples = vec![sample(500.0, None); 2];
        let merged = merge_enriched(nodes(2), &samples, &[], &[7.0]);
        assert_eq!(merged[0].projected_reward, 7.0);
        assert_eq!(merged[1].projected_reward, 0.0);
    }

    #[test]
    fn test_total_storage() {
        let samples = vec![sample(512.0, None), sample(640.0, None), sample(520.5, None)];
        let merged = merge_enriched(nodes(3), &samples, &[], &[]);
        let expected = (512.0 + 640.0 + 520.5) / 1024.0;
        assert!((total_storage_tb(&merged) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_list_stats() {
        let stats = DashboardStats::compute(&[]);
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.total_storage_tb, 0.0);
        assert_eq!(stats.epoch_count, EPOCH_PLACEHOLDER);
        assert_eq!(stats.risk_count, 0);
    }

    #[test]
    fn test_epoch_placeholder_without_timestamps() {
        let samples = vec![sample(500.0, None); 4];
        let merged = merge_enriched(nodes(4), &samples, &[], &[]);
        assert_eq!(epoch_count(&merged), 1342);
    }

    #[test]
    fn test_epoch_count_deduplicates_timestamps() {
        let samples = vec![
            sample(500.0, Some(100)),
            sample(500.0, Some(200)),
            sample(500.0, Some(100)),
            sample(500.0, None),
        ];
        let merged = merge_enriched(nodes(4), &samples, &[], &[]);
        assert_eq!(epoch_count(&merged), 2);
    }

    #[test]
    fn test_stats_count_risk_nodes() {
        let samples = vec![sample(500.0, None); 3];
        let merged = merge_enriched(nodes(3), &samples, &[risk(-0.5), AnomalyResult {
            status: AnomalyStatus::Healthy,
            anomaly_score: 0.2,
        }, risk(-0.9)], &[]);
        let stats = DashboardStats::compute(&merged);
        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.risk_count, 2);
    }
}
