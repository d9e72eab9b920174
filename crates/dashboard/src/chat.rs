//! # Chat Panel
//!
//! Free-text questions relayed to the prediction service.
//!
//! ## State
//!
//! - transcript: append-only, starts with [`GREETING`]
//! - `is_typing`: set while a request is in flight
//!
//! ## Submit
//!
//! 1. Empty or whitespace-only input → [`SubmitOutcome::Empty`], no call.
//! 2. Request already in flight → [`SubmitOutcome::Busy`], no call.
//! 3. Append the user message, set `is_typing`, call `chat`.
//! 4. Append the reply (or [`CHAT_FALLBACK`]), clear `is_typing`.
//!
//! At most one request is in flight per panel.
//!
//! [`CHAT_FALLBACK`]: crate::fallback::CHAT_FALLBACK

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use pnode_common::ChatMessage;
use pnode_predict::PredictionService;

use crate::fallback::chat_reply_or_fallback;

pub const GREETING: &str =
    "Hello! I am your Xandeum Data Agent. Ask me anything about the network nodes, anomalies, or rewards.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was blank; nothing was sent.
    Empty,
    /// Another request is still in flight; nothing was sent.
    Busy,
    /// The assistant message appended to the transcript.
    Answered(ChatMessage),
}

pub struct ChatPanel {
    service: Arc<dyn PredictionService>,
    transcript: RwLock<Vec<ChatMessage>>,
    typing: AtomicBool,
}

/// Clears the typing flag when the request future completes or is dropped.
struct TypingGuard<'a>(&'a AtomicBool);

impl Drop for TypingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ChatPanel {
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        Self {
            service,
            transcript: RwLock::new(vec![ChatMessage::assistant(GREETING)]),
            typing: AtomicBool::new(false),
        }
    }

    /// Snapshot of the transcript, oldest first.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.read().clone()
    }

    pub fn len(&self) -> usize {
        self.transcript.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.read().is_empty()
    }

    pub fn is_typing(&self) -> bool {
        self.typing.load(Ordering::SeqCst)
    }

    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        if input.trim().is_empty() {
            return SubmitOutcome::Empty;
        }

        if self
            .typing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("chat request already in flight");
            return SubmitOutcome::Busy;
        }
        let _guard = TypingGuard(&self.typing);

        self.transcript.write().push(ChatMessage::user(input));

        let reply = chat_reply_or_fallback(self.service.chat(input).await);
        let message = ChatMessage::assistant(reply);
        self.transcript.write().push(message.clone());

        SubmitOutcome::Answered(message)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
