//! Upstream health report.
//!
//! The dashboard depends on two services and nothing else, so the report is
//! one line per upstream:
//!
//! - Node directory: one `getClusterNodes` round trip. An empty cluster is
//!   reachable but useless, so it counts as degraded.
//! - Prediction service: `GET /health`. Untrained models mean every reward
//!   and anomaly falls back to its default, which is also degraded.
//!
//! The overall status is the worst upstream status.

use std::time::Instant;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use pnode_directory::NodeDirectory;
use pnode_predict::PredictionService;

use crate::render::truncate_str;

pub const DIRECTORY_COMPONENT: &str = "Node Directory";
pub const PREDICTION_COMPONENT: &str = "Prediction Service";

/// Ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// Reachable, but the dashboard would show fallback data.
    Degraded,
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        };
        f.write_str(s)
    }
}

impl HealthStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "✓",
            HealthStatus::Degraded => "⚠",
            HealthStatus::Unhealthy => "✗",
        }
    }
}

/// One upstream's line in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    pub latency_ms: u64,
    /// A summary when healthy, otherwise the problems found.
    pub notes: Vec<String>,
}

impl ComponentHealth {
    pub fn new(name: &str, status: HealthStatus, latency_ms: u64, notes: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            latency_ms,
            notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub overall: HealthStatus,
    pub components: Vec<ComponentHealth>,
    pub elapsed_ms: u64,
}

impl HealthReport {
    pub fn new(components: Vec<ComponentHealth>, elapsed_ms: u64) -> Self {
        let overall = components
            .iter()
            .map(|c| c.status)
            .max()
            .unwrap_or(HealthStatus::Healthy);
        Self {
            overall,
            components,
            elapsed_ms,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.overall == HealthStatus::Healthy
    }

    /// Plain-text report; notes after the first wrap under their component.
    pub fn to_table(&self) -> String {
        let mut out = format!(
            "pNode dashboard upstreams: {} {} ({} ms)\n\n",
            self.overall.symbol(),
            self.overall,
            self.elapsed_ms
        );
        for c in &self.components {
            let mut notes = c.notes.iter();
            out.push_str(&format!(
                "  {} {:<20} {:<10} {:>6} ms  {}\n",
                c.status.symbol(),
                c.name,
                c.status,
                c.latency_ms,
                truncate_str(notes.next().map(String::as_str).unwrap_or(""), 60)
            ));
            for note in notes {
                out.push_str(&format!("{:46}{}\n", "", truncate_str(note, 60)));
            }
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("failed to serialize health report: {}", e))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PROBES
// ════════════════════════════════════════════════════════════════════════════

pub async fn check_directory_health(directory: &dyn NodeDirectory) -> ComponentHealth {
    let start = Instant::now();
    let result = directory.fetch_nodes().await;
    let latency = start.elapsed().as_millis() as u64;

    let (status, note) = match result {
        Ok(nodes) if nodes.is_empty() => {
            (HealthStatus::Degraded, "cluster reported no nodes".to_string())
        }
        Ok(nodes) => (HealthStatus::Healthy, format!("{} nodes", nodes.len())),
        Err(e) => (
            HealthStatus::Unhealthy,
            format!("{}: {}", directory.endpoint(), e),
        ),
    };
    ComponentHealth::new(DIRECTORY_COMPONENT, status, latency, vec![note])
}

pub async fn check_prediction_health(service: &dyn PredictionService) -> ComponentHealth {
    let start = Instant::now();
    let result = service.health().await;
    let latency = start.elapsed().as_millis() as u64;

    let health = match result {
        Ok(h) => h,
        Err(e) => {
            return ComponentHealth::new(
                PREDICTION_COMPONENT,
                HealthStatus::Unhealthy,
                latency,
                vec![format!("{} unreachable: {}", service.base_url(), e)],
            );
        }
    };

    let mut issues = Vec::new();
    if !health.is_online() {
        issues.push(format!("service reports status '{}'", health.status));
    }
    if !health.models_trained {
        issues.push("models not trained; rewards and anomalies will fall back".to_string());
    }

    if issues.is_empty() {
        let agent = if health.ai_agent_active { "llm agent" } else { "rule-based agent" };
        ComponentHealth::new(PREDICTION_COMPONENT, HealthStatus::Healthy, latency, vec![agent.to_string()])
    } else {
        ComponentHealth::new(PREDICTION_COMPONENT, HealthStatus::Degraded, latency, issues)
    }
}

/// Checks both upstreams, directory first.
pub async fn check_all(
    directory: &dyn NodeDirectory,
    service: &dyn PredictionService,
) -> HealthReport {
    let start = Instant::now();
    let components = vec![
        check_directory_health(directory).await,
        check_prediction_health(service).await,
    ];
    HealthReport::new(components, start.elapsed().as_millis() as u64)
}
