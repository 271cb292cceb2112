//! Base trait for completion providers

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Error type for completion calls
#[derive(Error, Debug)]
pub enum CompletionError {
    /// The endpoint signalled throttling; transient, the user may retry later
    #[error("rate limited by completion endpoint")]
    RateLimited { retry_after: Option<Duration> },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CompletionError {
    /// Whether this failure class is worth retrying after a pause
    pub fn is_retriable(&self) -> bool {
        matches!(self, CompletionError::RateLimited { .. })
    }
}

pub type CompletionResult<T> = Result<T, CompletionError>;

/// A message in the chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Response from a completion provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    /// Trimmed text of the top completion choice
    pub text: String,
    #[serde(default = "default_finish_reason")]
    pub finish_reason: String,
    #[serde(default)]
    pub usage: HashMap<String, i64>,
}

fn default_finish_reason() -> String {
    "stop".to_string()
}

/// Trait for completion providers
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one chat completion request.
    ///
    /// `messages` must already be in conversation order; the provider
    /// forwards them verbatim. No retry happens here: retry decisions
    /// belong to the caller, so a transient failure never turns into
    /// duplicate billable calls.
    async fn complete(
        &self,
        messages: Vec<Message>,
        model: Option<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> CompletionResult<Completion>;

    /// Get the default model for this provider
    fn default_model(&self) -> String;
}
