//! # Metrics Source
//!
//! Per-node metrics fed to the prediction service.
//!
//! The cluster exposes no telemetry yet, so [`SyntheticMetricsSource`] draws
//! placeholder values uniformly at random. Anything implementing
//! [`MetricsSource`] can replace it; the aggregation only sees
//! [`MetricsSample`]s.
//!
//! | Field             | Range        |
//! |-------------------|--------------|
//! | `uptime_score`    | `[0.9, 1.0)` |
//! | `storage_used_gb` | `[500, 700)` |
//! | `latency_ms`      | `[30, 80)`   |

use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pnode_common::{NodeRecord, SyntheticMetrics};

pub const UPTIME_RANGE: Range<f64> = 0.9..1.0;
pub const STORAGE_GB_RANGE: Range<f64> = 500.0..700.0;
pub const LATENCY_MS_RANGE: Range<f64> = 30.0..80.0;

/// Metrics for one node plus an optional observation timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSample {
    pub metrics: SyntheticMetrics,
    /// Unix seconds of the observation. Synthetic samples have none.
    pub timestamp: Option<u64>,
}

/// Produces one sample per node, once per fetch cycle.
pub trait MetricsSource: Send {
    fn sample(&mut self, node: &NodeRecord) -> MetricsSample;

    fn sample_all(&mut self, nodes: &[NodeRecord]) -> Vec<MetricsSample> {
        nodes.iter().map(|n| self.sample(n)).collect()
    }
}

/// Independent uniform draws, uncorrelated across nodes and cycles.
pub struct SyntheticMetricsSource<R = StdRng> {
    rng: R,
}

impl SyntheticMetricsSource<StdRng> {
    /// Seeds from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng> SyntheticMetricsSource<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> MetricsSource for SyntheticMetricsSource<R> {
    fn sample(&mut self, _node: &NodeRecord) -> MetricsSample {
        MetricsSample {
            metrics: SyntheticMetrics {
                uptime_score: self.rng.gen_range(UPTIME_RANGE),
                storage_used_gb: self.rng.gen_range(STORAGE_GB_RANGE),
                latency_ms: self.rng.gen_range(LATENCY_MS_RANGE),
            },
            timestamp: None,
        }
    }
}
