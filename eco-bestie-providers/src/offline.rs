//! Offline client for test mode
//!
//! Answers from a canned tip without touching the network, so a visit can
//! be exercised end to end with no credits used.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

use crate::base::{Completion, CompletionProvider, CompletionResult, Message};

const CANNED_TIP: &str = "Try switching to shampoo bars or refill stations instead of plastic \
bottles — they're low waste and long-lasting! 💚";

/// Completion provider that never calls out
pub struct OfflineClient {
    canned_reply: String,
}

impl OfflineClient {
    /// Create an offline client with a custom canned reply
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            canned_reply: reply.into(),
        }
    }
}

impl Default for OfflineClient {
    fn default() -> Self {
        Self::with_reply(CANNED_TIP)
    }
}

#[async_trait]
impl CompletionProvider for OfflineClient {
    async fn complete(
        &self,
        messages: Vec<Message>,
        _model: Option<String>,
        _max_tokens: u32,
        _temperature: f32,
    ) -> CompletionResult<Completion> {
        debug!(
            "Offline mode: answering {} messages with the canned tip",
            messages.len()
        );
        Ok(Completion {
            text: self.canned_reply.trim().to_string(),
            finish_reason: "stop".to_string(),
            usage: HashMap::new(),
        })
    }

    fn default_model(&self) -> String {
        "offline".to_string()
    }
}
