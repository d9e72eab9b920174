//! # pNode Dashboard
//!
//! Aggregates cluster nodes with AI predictions and renders them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                              Dashboard                               │
//! │                                                                      │
//! │  NodeDirectory ──► MetricsSource ──► PredictionService               │
//! │  (fetch_nodes)     (one sample        ├─ analyze_anomalies (1 call)  │
//! │                     per node)         └─ predict_reward (N parallel) │
//! │                                              │                       │
//! │                                              ▼                       │
//! │                             merge_enriched + DashboardStats          │
//! │                                              │                       │
//! │                                              ▼                       │
//! │                          ViewState: Loading → Ready | Failed         │
//! └──────────────────────────────────────────────────────────────────────┘
//!
//! ChatPanel ──► PredictionService::chat   (independent of the fetch cycle)
//! ```
//!
//! # Failure Policy
//!
//! | Failure                 | Effect                                  |
//! |-------------------------|-----------------------------------------|
//! | directory unavailable   | `Failed`, user-initiated retry only     |
//! | anomaly batch failed    | every node `Healthy`, no score          |
//! | one reward failed       | that node's reward is `0`               |
//! | chat failed             | fallback text appended to transcript    |
//!
//! # Modules
//!
//! - [`metrics`]: the metrics-source boundary and its synthetic implementation
//! - [`aggregate`]: index-aligned merge and stat tiles
//! - [`fallback`]: default substitution for prediction failures
//! - [`state`]: the fetch-cycle state machine
//! - [`chat`]: the chat panel
//! - [`render`]: terminal rendering
//! - [`health`]: component health report

pub mod aggregate;
pub mod chat;
pub mod fallback;
pub mod health;
pub mod metrics;
pub mod render;
pub mod state;

pub use aggregate::{merge_enriched, DashboardStats, EPOCH_PLACEHOLDER, GB_PER_TB};
pub use chat::{ChatPanel, SubmitOutcome, GREETING};
pub use fallback::CHAT_FALLBACK;
pub use health::{ComponentHealth, HealthReport, HealthStatus};
pub use metrics::{MetricsSample, MetricsSource, SyntheticMetricsSource};
pub use state::{Dashboard, DashboardView, Phase, ViewState, FAILED_MESSAGE};
