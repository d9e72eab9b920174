//! # pNode Common
//!
//! Types shared across the pNode analytics workspace.
//!
//! ```text
//! pnode_directory ──► NodeRecord ──┐
//!                                  ├──► pnode_dashboard ──► EnrichedNode
//! pnode_predict ──► AnomalyResult ─┘
//! ```
//!
//! - [`model`]: node records, metrics, predictions, chat messages
//! - [`error`]: `DirectoryError` (fatal) and `PredictionError` (absorbed)
//! - [`config`]: endpoint configuration

pub mod config;
pub mod error;
pub mod model;

pub use config::{ConfigError, DashboardConfig, DEFAULT_DIRECTORY_RPC, DEFAULT_PREDICTION_URL};
pub use error::{DirectoryError, PredictionError};
pub use model::{
    AnomalyResult, AnomalyStatus, ChatMessage, ChatRole, EnrichedNode, NodeRecord,
    SyntheticMetrics, ADDR_SENTINEL, VERSION_SENTINEL,
};
