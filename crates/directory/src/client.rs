//! # Node Directory Client
//!
//! Reads the list of gossip-known nodes from a cluster RPC endpoint.
//!
//! ## Architecture
//!
//! ```text
//! NodeDirectory::fetch_nodes()
//!      │
//!      ├─ RpcNodeDirectory   POST {"method":"getClusterNodes"} ─► RPC node
//!      │        │
//!      │        └─ normalize_nodes()  (sentinels for missing fields)
//!      │
//!      └─ MockNodeDirectory  FIFO of pre-loaded results (tests)
//!      │
//!      ▼
//! Result<Vec<NodeRecord>, DirectoryError>
//! ```
//!
//! ## No Implicit Retry
//!
//! One request per call. A failed call returns a [`DirectoryError`] and no
//! partial list; retrying is the caller's decision.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use pnode_common::{DirectoryError, NodeRecord};

use crate::normalize::{normalize_nodes, RawClusterNode};

/// JSON-RPC method listing the cluster's gossip table.
pub const CLUSTER_NODES_METHOD: &str = "getClusterNodes";

// ════════════════════════════════════════════════════════════════════════════════
// TRAIT
// ════════════════════════════════════════════════════════════════════════════════

/// Source of the cluster's node list.
///
/// ## Contract
///
/// - Returns nodes in the order the upstream reported them.
/// - Never returns a partial list: any failure is an `Err`.
/// - Does not retry internally.
#[async_trait]
pub trait NodeDirectory: Send + Sync {
    async fn fetch_nodes(&self) -> Result<Vec<NodeRecord>, DirectoryError>;

    /// Endpoint description used in logs and health reports.
    fn endpoint(&self) -> &str;
}

// ════════════════════════════════════════════════════════════════════════════════
// JSON-RPC WIRE TYPES
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Vec<RawClusterNode>>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// RPC CLIENT
// ════════════════════════════════════════════════════════════════════════════════

/// [`NodeDirectory`] backed by a cluster JSON-RPC endpoint.
#[derive(Clone)]
pub struct RpcNodeDirectory {
    endpoint: String,
    client: Client,
}

impl RpcNodeDirectory {
    /// Builds a client for `endpoint`. `timeout` of `None` means no deadline.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, DirectoryError> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| DirectoryError::Unavailable(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(endpoint, client))
    }

    /// Uses an existing `reqwest::Client` (shared connection pool).
    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }
}

#[async_trait]
impl NodeDirectory for RpcNodeDirectory {
    async fn fetch_nodes(&self) -> Result<Vec<NodeRecord>, DirectoryError> {
        debug!(endpoint = %self.endpoint, "requesting cluster nodes");

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: CLUSTER_NODES_METHOD,
            params: Vec::new(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "cluster RPC returned error status");
            return Err(DirectoryError::Unavailable(format!("HTTP {} {}", status, body)));
        }

        let body: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| DirectoryError::Malformed(e.to_string()))?;

        if let Some(err) = body.error {
            return Err(DirectoryError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        let raw = body
            .result
            .ok_or_else(|| DirectoryError::Malformed("response has neither result nor error".to_string()))?;

        let nodes = normalize_nodes(raw)?;
        info!(count = nodes.len(), "retrieved cluster nodes");
        Ok(nodes)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// MOCK
// ════════════════════════════════════════════════════════════════════════════════

/// Directory for tests without a network.
///
/// Results are pre-loaded and returned FIFO. When the queue is empty,
/// returns `DirectoryError::Unavailable("no mock response")`.
pub struct MockNodeDirectory {
    responses: Mutex<Vec<Result<Vec<NodeRecord>, DirectoryError>>>,
    calls: AtomicUsize,
}

impl MockNodeDirectory {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push_nodes(&self, nodes: Vec<NodeRecord>) {
        self.responses.lock().push(Ok(nodes));
    }

    pub fn push_error(&self, error: DirectoryError) {
        self.responses.lock().push(Err(error));
    }

    /// Number of `fetch_nodes` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockNodeDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeDirectory for MockNodeDirectory {
    async fn fetch_nodes(&self) -> Result<Vec<NodeRecord>, DirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut queue = self.responses.lock();
        if queue.is_empty() {
            return Err(DirectoryError::Unavailable("no mock response".to_string()));
        }
        queue.remove(0)
    }

    fn endpoint(&self) -> &str {
        "mock://directory"
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
