//! # Dashboard Data Model
//!
//! Types shared by the directory client, the prediction client and the
//! dashboard.
//!
//! ## Lifetimes
//!
//! | Type               | Produced by          | Lifetime                   |
//! |--------------------|----------------------|----------------------------|
//! | `NodeRecord`       | directory client     | one fetch cycle            |
//! | `SyntheticMetrics` | metrics source       | one fetch cycle            |
//! | `AnomalyResult`    | prediction service   | one fetch cycle            |
//! | `EnrichedNode`     | aggregation          | one fetch cycle (replaced) |
//! | `ChatMessage`      | chat panel           | process lifetime           |
//!
//! Nothing here is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

// ════════════════════════════════════════════════════════════════════════════
// SENTINELS
// ════════════════════════════════════════════════════════════════════════════

/// Stand-in for an address the cluster did not report.
pub const ADDR_SENTINEL: &str = "N/A";

/// Stand-in for a version the cluster did not report.
pub const VERSION_SENTINEL: &str = "Unknown";

// ════════════════════════════════════════════════════════════════════════════
// NODE RECORD
// ════════════════════════════════════════════════════════════════════════════

/// A cluster node as reported by the gossip directory, normalized.
///
/// Every field is always populated: absent upstream values are replaced by
/// [`ADDR_SENTINEL`], [`VERSION_SENTINEL`] or `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Base58 node identity. Unique within one fetch.
    pub pubkey: String,
    pub gossip_addr: String,
    pub tpu_addr: String,
    pub rpc_addr: String,
    pub version: String,
    pub feature_set: u64,
    pub shred_version: u64,
}

impl NodeRecord {
    /// A record carrying only the identity, every other field at its sentinel.
    pub fn with_pubkey(pubkey: impl Into<String>) -> Self {
        Self {
            pubkey: pubkey.into(),
            gossip_addr: ADDR_SENTINEL.to_string(),
            tpu_addr: ADDR_SENTINEL.to_string(),
            rpc_addr: ADDR_SENTINEL.to_string(),
            version: VERSION_SENTINEL.to_string(),
            feature_set: 0,
            shred_version: 0,
        }
    }

    /// Returns true if the cluster did not report a version for this node.
    pub fn has_unknown_version(&self) -> bool {
        self.version == VERSION_SENTINEL
    }
}

// ════════════════════════════════════════════════════════════════════════════
// METRICS
// ════════════════════════════════════════════════════════════════════════════

/// Per-node metrics sent to the prediction service.
///
/// Field names are the wire names used by `/predict/rewards` and
/// `/analyze/anomalies`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyntheticMetrics {
    /// Fraction of time the node was reachable, in `[0.9, 1.0)`.
    pub uptime_score: f64,
    /// Storage committed by the node in GB, in `[500, 700)`.
    pub storage_used_gb: f64,
    /// Round-trip latency in milliseconds, in `[30, 80)`.
    pub latency_ms: f64,
}

// ════════════════════════════════════════════════════════════════════════════
// ANOMALY
// ════════════════════════════════════════════════════════════════════════════

/// Classification returned by the anomaly detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnomalyStatus {
    #[default]
    Healthy,
    Risk,
}

impl fmt::Display for AnomalyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyStatus::Healthy => write!(f, "Healthy"),
            AnomalyStatus::Risk => write!(f, "Risk"),
        }
    }
}

impl AnomalyStatus {
    pub fn is_risk(&self) -> bool {
        matches!(self, AnomalyStatus::Risk)
    }
}

/// One entry of the `/analyze/anomalies` response.
///
/// Carries no node identifier: it belongs to the metrics entry at the same
/// index of the request batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    pub status: AnomalyStatus,
    pub anomaly_score: f64,
}

// ════════════════════════════════════════════════════════════════════════════
// ENRICHED NODE
// ════════════════════════════════════════════════════════════════════════════

/// View model: a [`NodeRecord`] merged with its metrics and predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedNode {
    #[serde(flatten)]
    pub node: NodeRecord,
    pub anomaly_status: AnomalyStatus,
    /// `None` when the anomaly service returned no entry for this node.
    pub anomaly_score: Option<f64>,
    /// Projected epoch reward in XAND. `0.0` when the prediction failed.
    pub projected_reward: f64,
    /// Storage in GB taken from the node's metrics.
    pub storage_used: f64,
    /// Observation timestamp supplied by the metrics source, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

// ════════════════════════════════════════════════════════════════════════════
// CHAT
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One transcript entry. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// UNIT TESTS
// ════════════════════════════════════════════════════════════════════════════
