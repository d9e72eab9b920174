//! # pNode Predict
//!
//! Client side of the remote AI service: projected rewards, batch anomaly
//! classification, free-text chat and a health probe.
//!
//! - [`client`]: the [`PredictionService`] trait and its HTTP implementation
//! - [`mock`]: an in-memory implementation with call counters

pub mod client;
pub mod mock;

pub use client::{
    HttpPredictionClient, PredictionService, ServiceHealth, ANOMALIES_ROUTE, CHAT_ROUTE,
    HEALTH_ROUTE, REWARDS_ROUTE,
};
pub use mock::MockPredictionService;
