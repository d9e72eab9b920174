//! In-memory [`PredictionService`] for tests.
//!
//! Defaults:
//!
//! - `predict_reward` returns `Ok(1.0)`.
//! - `analyze_anomalies` returns one `Healthy` entry (score `0.1`) per input.
//! - `chat` pops pre-loaded replies FIFO, `Network("no mock response")` when empty.
//! - `health` reports online with trained models.
//!
//! Every operation counts its calls so tests can assert that nothing was sent.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use pnode_common::{AnomalyResult, AnomalyStatus, PredictionError, SyntheticMetrics};

use crate::client::{PredictionService, ServiceHealth};

type RewardFn = dyn Fn(&SyntheticMetrics) -> Result<f64, PredictionError> + Send + Sync;

pub struct MockPredictionService {
    reward: Box<RewardFn>,
    anomalies: Mutex<Option<Result<Vec<AnomalyResult>, PredictionError>>>,
    chat_replies: Mutex<Vec<Result<String, PredictionError>>>,
    health: Mutex<Result<ServiceHealth, PredictionError>>,
    reward_calls: AtomicUsize,
    anomaly_calls: AtomicUsize,
    chat_calls: AtomicUsize,
}

impl MockPredictionService {
    pub fn new() -> Self {
        Self {
            reward: Box::new(|_| Ok(1.0)),
            anomalies: Mutex::new(None),
            chat_replies: Mutex::new(Vec::new()),
            health: Mutex::new(Ok(ServiceHealth {
                status: "online".to_string(),
                models_trained: true,
                ai_agent_active: false,
            })),
            reward_calls: AtomicUsize::new(0),
            anomaly_calls: AtomicUsize::new(0),
            chat_calls: AtomicUsize::new(0),
        }
    }

    /// Replaces the reward function.
    pub fn with_reward<F>(mut self, f: F) -> Self
    where
        F: Fn(&SyntheticMetrics) -> Result<f64, PredictionError> + Send + Sync + 'static,
    {
        self.reward = Box::new(f);
        self
    }

    /// Fixes the anomaly response regardless of batch size.
    pub fn set_anomalies(&self, result: Result<Vec<AnomalyResult>, PredictionError>) {
        *self.anomalies.lock() = Some(result);
    }

    pub fn push_chat_reply(&self, reply: Result<String, PredictionError>) {
        self.chat_replies.lock().push(reply);
    }

    pub fn set_health(&self, health: Result<ServiceHealth, PredictionError>) {
        *self.health.lock() = health;
    }

    pub fn reward_calls(&self) -> usize {
        self.reward_calls.load(Ordering::SeqCst)
    }

    pub fn anomaly_calls(&self) -> usize {
        self.anomaly_calls.load(Ordering::SeqCst)
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockPredictionService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PredictionService for MockPredictionService {
    async fn predict_reward(&self, metrics: &SyntheticMetrics) -> Result<f64, PredictionError> {
        self.reward_calls.fetch_add(1, Ordering::SeqCst);
        (self.reward)(metrics)
    }

    async fn analyze_anomalies(
        &self,
        batch: &[SyntheticMetrics],
    ) -> Result<Vec<AnomalyResult>, PredictionError> {
        self.anomaly_calls.fetch_add(1, Ordering::SeqCst);
        match self.anomalies.lock().as_ref() {
            Some(fixed) => fixed.clone(),
            None => Ok(batch
                .iter()
                .map(|_| AnomalyResult {
                    status: AnomalyStatus::Healthy,
                    anomaly_score: 0.1,
                })
                .collect()),
        }
    }

    async fn chat(&self, _query: &str) -> Result<String, PredictionError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        let mut queue = self.chat_replies.lock();
        if queue.is_empty() {
            return Err(PredictionError::Network("no mock response".to_string()));
        }
        queue.remove(0)
    }

    async fn health(&self) -> Result<ServiceHealth, PredictionError> {
        self.health.lock().clone()
    }

    fn base_url(&self) -> &str {
        "mock://prediction"
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// COMPILE-TIME ASSERTIONS
// ════════════════════════════════════════════════════════════════════════════════

const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn check() {
        assert_send_sync::<MockPredictionService>();
    }
    let _ = check;
};
