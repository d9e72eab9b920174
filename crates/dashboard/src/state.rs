//! # Dashboard State Machine
//!
//! ```text
//!            load()/retry()
//!   ┌──────────────────────────────┐
//!   ▼                              │
//! Loading ──► Ready(view)          │
//!    │                             │
//!    └──────► Failed{message} ─────┘
//! ```
//!
//! ## Fetch Cycle
//!
//! 1. `NodeDirectory::fetch_nodes`. Failure → `Failed`, nothing else is called.
//! 2. One metrics sample per node.
//! 3. One `analyze_anomalies` call for the whole batch.
//! 4. One `predict_reward` call per node, all in flight together.
//! 5. Merge by index, compute stats → `Ready`.
//!
//! Entering `Loading` drops the previous view; a retry shares nothing with
//! the attempt before it. Nothing is retried automatically.

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use pnode_common::{DirectoryError, EnrichedNode};
use pnode_directory::NodeDirectory;
use pnode_predict::PredictionService;

use crate::aggregate::{merge_enriched, DashboardStats};
use crate::fallback::{anomalies_or_empty, reward_or_default};
use crate::metrics::MetricsSource;

/// Message shown when the directory cannot be read.
pub const FAILED_MESSAGE: &str = "Failed to fetch pNodes. Ensure you are connected to the network.";

/// State discriminant, recorded on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Loading,
    Ready,
    Failed,
}

/// Everything the ready screen shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub nodes: Vec<EnrichedNode>,
    pub stats: DashboardStats,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Ready(DashboardView),
    Failed { message: String },
}

impl ViewState {
    pub fn phase(&self) -> Phase {
        match self {
            ViewState::Loading => Phase::Loading,
            ViewState::Ready(_) => Phase::Ready,
            ViewState::Failed { .. } => Phase::Failed,
        }
    }

    pub fn view(&self) -> Option<&DashboardView> {
        match self {
            ViewState::Ready(view) => Some(view),
            _ => None,
        }
    }
}

/// Orchestrates the fetch cycle over injected clients.
pub struct Dashboard {
    directory: Arc<dyn NodeDirectory>,
    predictor: Arc<dyn PredictionService>,
    metrics: Box<dyn MetricsSource>,
    state: ViewState,
    history: Vec<Phase>,
}

impl Dashboard {
    pub fn new(
        directory: Arc<dyn NodeDirectory>,
        predictor: Arc<dyn PredictionService>,
        metrics: Box<dyn MetricsSource>,
    ) -> Self {
        Self {
            directory,
            predictor,
            metrics,
            state: ViewState::Loading,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Every phase entered so far, oldest first.
    pub fn history(&self) -> &[Phase] {
        &self.history
    }

    /// Runs a full fetch cycle and returns the resulting state.
    pub async fn load(&mut self) -> &ViewState {
        self.transition(ViewState::Loading);

        let next = match self.run_cycle().await {
            Ok(view) => {
                info!(
                    nodes = view.stats.node_count,
                    risk = view.stats.risk_count,
                    total_storage_tb = view.stats.total_storage_tb,
                    "dashboard ready"
                );
                ViewState::Ready(view)
            }
            Err(e) => {
                error!(endpoint = %self.directory.endpoint(), error = %e, "failed to fetch pNodes");
                ViewState::Failed {
                    message: FAILED_MESSAGE.to_string(),
                }
            }
        };

        self.transition(next);
        &self.state
    }

    /// User-initiated reload. Identical to [`Dashboard::load`]; nothing from
    /// the previous attempt is reused.
    pub async fn retry(&mut self) -> &ViewState {
        info!(from = ?self.phase(), "reloading dashboard");
        self.load().await
    }

    fn transition(&mut self, next: ViewState) {
        self.history.push(next.phase());
        self.state = next;
    }

    async fn run_cycle(&mut self) -> Result<DashboardView, DirectoryError> {
        let nodes = self.directory.fetch_nodes().await?;

        let samples = self.metrics.sample_all(&nodes);
        let batch: Vec<_> = samples.iter().map(|s| s.metrics).collect();

        let predictor = Arc::clone(&self.predictor);
        let anomalies = anomalies_or_empty(predictor.analyze_anomalies(&batch).await);

        let rewards = join_all(batch.iter().enumerate().map(|(i, metrics)| {
            let predictor = Arc::clone(&predictor);
            async move { reward_or_default(predictor.predict_reward(metrics).await, i) }
        }))
        .await;

        let enriched = merge_enriched(nodes, &samples, &anomalies, &rewards);
        let stats = DashboardStats::compute(&enriched);
        Ok(DashboardView {
            nodes: enriched,
            stats,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
