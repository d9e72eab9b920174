//! Default substitution for failed prediction calls.
//!
//! The prediction client reports every failure as an error. The dashboard
//! renders regardless, so each failure is logged here and replaced:
//!
//! | Operation           | Default                 |
//! |---------------------|-------------------------|
//! | `predict_reward`    | `0.0`                   |
//! | `analyze_anomalies` | empty list              |
//! | `chat`              | [`CHAT_FALLBACK`] text  |

use tracing::warn;

use pnode_common::{AnomalyResult, PredictionError};

pub const CHAT_FALLBACK: &str = "I'm having trouble connecting to the AI brain right now.";

/// Reward for the node at `index`, or `0.0` if the prediction failed.
pub fn reward_or_default(result: Result<f64, PredictionError>, index: usize) -> f64 {
    match result {
        Ok(reward) => reward,
        Err(e) => {
            warn!(index, network = e.is_network(), error = %e, "reward prediction failed, using 0");
            0.0
        }
    }
}

/// Anomaly results, or an empty list if the batch call failed.
pub fn anomalies_or_empty(result: Result<Vec<AnomalyResult>, PredictionError>) -> Vec<AnomalyResult> {
    match result {
        Ok(list) => list,
        Err(e) => {
            warn!(
                network = e.is_network(),
                error = %e,
                "anomaly analysis failed, every node defaults to Healthy"
            );
            Vec::new()
        }
    }
}

pub fn chat_reply_or_fallback(result: Result<String, PredictionError>) -> String {
    match result {
        Ok(reply) => reply,
        Err(e) => {
            warn!(network = e.is_network(), error = %e, "chat request failed");
            CHAT_FALLBACK.to_string()
        }
    }
}
