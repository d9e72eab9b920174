//! # Prediction Service Client
//!
//! HTTP client for the remote AI service.
//!
//! ## Routes
//!
//! | Operation              | Route                      | Request                 | Response                      |
//! |------------------------|----------------------------|-------------------------|-------------------------------|
//! | `predict_reward`       | `POST /predict/rewards`    | `SyntheticMetrics`      | `{projected_epoch_reward}`    |
//! | `analyze_anomalies`    | `POST /analyze/anomalies`  | `[SyntheticMetrics]`    | `[{status, anomaly_score}]`   |
//! | `chat`                 | `POST /chat`               | `{query}`               | `{response}`                  |
//! | `health`               | `GET /health`              | -                       | `{status, models_trained, ..}`|
//!
//! ## Errors, Not Defaults
//!
//! Every operation returns `Result<_, PredictionError>`. Substituting a
//! default (zero reward, empty anomaly list, fallback chat text) is the
//! caller's decision. Any non-success status is an error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use pnode_common::{AnomalyResult, PredictionError, SyntheticMetrics};

pub const REWARDS_ROUTE: &str = "/predict/rewards";
pub const ANOMALIES_ROUTE: &str = "/analyze/anomalies";
pub const CHAT_ROUTE: &str = "/chat";
pub const HEALTH_ROUTE: &str = "/health";

// ════════════════════════════════════════════════════════════════════════════════
// WIRE TYPES
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct RewardResponse {
    projected_epoch_reward: f64,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// `"online"` when the service is up.
    pub status: String,
    /// Whether the reward and anomaly models finished training.
    #[serde(default)]
    pub models_trained: bool,
    /// Whether the LLM-backed chat agent is active (otherwise rule-based).
    #[serde(default)]
    pub ai_agent_active: bool,
}

impl ServiceHealth {
    pub fn is_online(&self) -> bool {
        self.status == "online"
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TRAIT
// ════════════════════════════════════════════════════════════════════════════════

/// The remote prediction/anomaly/chat service.
///
/// ## Contract
///
/// - `analyze_anomalies` is expected to return one entry per input, in
///   input order. The service does not echo node identifiers, so this is an
///   assumption about the service and is not checked here.
/// - Implementations do not retry and do not substitute defaults.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict_reward(&self, metrics: &SyntheticMetrics) -> Result<f64, PredictionError>;

    async fn analyze_anomalies(
        &self,
        batch: &[SyntheticMetrics],
    ) -> Result<Vec<AnomalyResult>, PredictionError>;

    async fn chat(&self, query: &str) -> Result<String, PredictionError>;

    async fn health(&self) -> Result<ServiceHealth, PredictionError>;

    /// Base URL used in logs and health reports.
    fn base_url(&self) -> &str;
}

// ════════════════════════════════════════════════════════════════════════════════
// HTTP CLIENT
// ════════════════════════════════════════════════════════════════════════════════

/// [`PredictionService`] over HTTP/JSON.
#[derive(Clone)]
pub struct HttpPredictionClient {
    base: String,
    client: Client,
}

impl HttpPredictionClient {
    /// Builds a client for `base`. `timeout` of `None` means no deadline.
    pub fn new(base: impl Into<String>, timeout: Option<Duration>) -> Result<Self, PredictionError> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| PredictionError::Network(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self::with_client(base, client))
    }

    pub fn with_client(base: impl Into<String>, client: Client) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { base, client }
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base, route)
    }

    async fn post_json<B, T>(&self, route: &str, body: &B) -> Result<T, PredictionError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(route);
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| PredictionError::Network(e.to_string()))?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, PredictionError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PredictionError::Status {
            status: status.as_u16(),
            body,
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| PredictionError::Malformed(e.to_string()))
}

#[async_trait]
impl PredictionService for HttpPredictionClient {
    async fn predict_reward(&self, metrics: &SyntheticMetrics) -> Result<f64, PredictionError> {
        let body: RewardResponse = self.post_json(REWARDS_ROUTE, metrics).await?;
        Ok(body.projected_epoch_reward)
    }

    async fn analyze_anomalies(
        &self,
        batch: &[SyntheticMetrics],
    ) -> Result<Vec<AnomalyResult>, PredictionError> {
        self.post_json(ANOMALIES_ROUTE, batch).await
    }

    async fn chat(&self, query: &str) -> Result<String, PredictionError> {
        let body: ChatResponse = self.post_json(CHAT_ROUTE, &ChatRequest { query }).await?;
        Ok(body.response)
    }

    async fn health(&self) -> Result<ServiceHealth, PredictionError> {
        let response = self
            .client
            .get(self.url(HEALTH_ROUTE))
            .send()
            .await
            .map_err(|e| PredictionError::Network(e.to_string()))?;
        decode(response).await
    }

    fn base_url(&self) -> &str {
        &self.base
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
