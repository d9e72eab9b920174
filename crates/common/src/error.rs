//! # Error Taxonomy
//!
//! Two categories:
//!
//! | Error              | Fatal | Handling                                     |
//! |--------------------|-------|----------------------------------------------|
//! | `DirectoryError`   | yes   | fetch cycle ends in `Failed`, user may retry |
//! | `PredictionError`  | no    | caller substitutes a safe default            |
//!
//! Neither is retried automatically.

use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// DIRECTORY ERROR
// ════════════════════════════════════════════════════════════════════════════

/// The node directory could not be read.
///
/// Every variant means the directory is unavailable for this fetch cycle; no
/// partial node list is ever returned alongside it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// Endpoint unreachable or returned a non-success HTTP status.
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    /// The RPC node answered with a JSON-RPC error object.
    #[error("directory rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Response body could not be decoded into node descriptors.
    #[error("malformed directory response: {0}")]
    Malformed(String),
}

// ════════════════════════════════════════════════════════════════════════════
// PREDICTION ERROR
// ════════════════════════════════════════════════════════════════════════════

/// A call to the prediction service failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PredictionError {
    /// Transport-level failure (connect, reset, timeout).
    #[error("prediction service network error: {0}")]
    Network(String),

    /// The service answered with a non-success HTTP status.
    #[error("prediction service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("malformed prediction response: {0}")]
    Malformed(String),
}

impl PredictionError {
    /// Returns true if the service was never reached.
    pub fn is_network(&self) -> bool {
        matches!(self, PredictionError::Network(_))
    }
}
