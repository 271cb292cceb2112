//! Per-visit exchange orchestration
//!
//! One `ChatExchange` owns one `Session` and drives each turn through
//! idle, pending, and resolved-or-dropped. `ask` takes `&mut self`, so a
//! visit can never have two calls in flight.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use eco_bestie_core::session::{Session, Turn};
use eco_bestie_core::Error as CoreError;
use eco_bestie_providers::{CompletionError, CompletionProvider};

use crate::context::ContextBuilder;

/// Error type for a chat exchange
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error(transparent)]
    Session(#[from] CoreError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl ExchangeError {
    /// Short human-readable notice for the UI.
    ///
    /// History stays intact after every failure, so each notice invites
    /// the user to simply resubmit.
    pub fn user_notice(&self) -> String {
        match self {
            ExchangeError::Completion(CompletionError::RateLimited { .. }) => {
                "🚫 We're taking a little break — too many questions at once! \
                 Please wait a minute and try again 🌿"
                    .to_string()
            }
            ExchangeError::Session(CoreError::Validation(_)) => {
                "Please type a question first.".to_string()
            }
            _ => "Something went wrong. Your question wasn't saved, so feel free to ask again."
                .to_string(),
        }
    }
}

/// Sampling parameters applied to every completion call
#[derive(Debug, Clone)]
pub struct SamplingParams {
    /// Model override; the provider default applies when unset
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 300,
            temperature: 0.7,
        }
    }
}

/// One user's visit: an owned session plus the completion boundary
pub struct ChatExchange {
    session: Session,
    provider: Arc<dyn CompletionProvider>,
    context: ContextBuilder,
    params: SamplingParams,
}

impl std::fmt::Debug for ChatExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatExchange")
            .field("session", &self.session)
            .field("context", &self.context)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl ChatExchange {
    /// Create a new exchange for a fresh visit
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        system_prompt: impl Into<String>,
        params: SamplingParams,
    ) -> Self {
        Self {
            session: Session::new(),
            provider,
            context: ContextBuilder::new(system_prompt),
            params,
        }
    }

    /// Ask one question and wait for the reply.
    ///
    /// Empty input is rejected before any external call. On success the
    /// turn is appended to history; on any provider failure the pending
    /// input is dropped so history is exactly what it was before the call.
    pub async fn ask(&mut self, text: &str) -> Result<String, ExchangeError> {
        self.session.append_user(text)?;
        let new_text = match self.session.pending() {
            Some(pending) => pending.to_string(),
            None => {
                return Err(CoreError::State("pending input missing after append".to_string()).into())
            }
        };

        let messages = self.context.build_messages(self.session.history(), &new_text);
        debug!(
            session_id = %self.session.id,
            "Sending {} messages to completion endpoint",
            messages.len()
        );

        let result = self
            .provider
            .complete(
                messages,
                self.params.model.clone(),
                self.params.max_tokens,
                self.params.temperature,
            )
            .await;

        match result {
            Ok(completion) => {
                let reply = completion.text;
                self.session.resolve_pending(&reply)?;
                Ok(reply)
            }
            Err(err) => {
                self.session.drop_pending();
                warn!(session_id = %self.session.id, "Completion call failed: {}", err);
                Err(err.into())
            }
        }
    }

    /// Clear all turns; the next prompt starts from empty context
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Completed turns for rendering
    pub fn history(&self) -> &[Turn] {
        self.session.history()
    }

    /// The underlying session
    pub fn session(&self) -> &Session {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use eco_bestie_providers::{Completion, CompletionResult, Message};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records every message list it receives and replies with canned text
    struct RecordingProvider {
        reply: String,
        calls: AtomicUsize,
        last_messages: Mutex<Vec<Message>>,
    }

    impl RecordingProvider {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
                last_messages: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for RecordingProvider {
        async fn complete(
            &self,
            messages: Vec<Message>,
            _model: Option<String>,
            _max_tokens: u32,
            _temperature: f32,
        ) -> CompletionResult<Completion> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_messages.lock().unwrap() = messages;
            Ok(Completion {
                text: self.reply.clone(),
                finish_reason: "stop".to_string(),
                usage: HashMap::new(),
            })
        }

        fn default_model(&self) -> String {
            "mock".to_string()
        }
    }

    /// Always fails with the given error constructor
    struct FailingProvider {
        rate_limited: bool,
    }

    #[async_trait]
    impl CompletionProvider for FailingProvider {
        async fn complete(
            &self,
            _messages: Vec<Message>,
            _model: Option<String>,
            _max_tokens: u32,
            _temperature: f32,
        ) -> CompletionResult<Completion> {
            if self.rate_limited {
                Err(CompletionError::RateLimited { retry_after: None })
            } else {
                Err(CompletionError::Api("HTTP 500: boom".to_string()))
            }
        }

        fn default_model(&self) -> String {
            "mock".to_string()
        }
    }

    fn exchange_with(provider: Arc<dyn CompletionProvider>) -> ChatExchange {
        ChatExchange::new(provider, "persona", SamplingParams::default())
    }

    #[tokio::test]
    async fn test_first_ask_builds_two_message_prompt() {
        let provider = Arc::new(RecordingProvider::new("Try compostable dishcloths."));
        let mut exchange = exchange_with(provider.clone());

        let reply = exchange
            .ask("What's a zero-waste swap for paper towels?")
            .await
            .unwrap();

        assert_eq!(reply, "Try compostable dishcloths.");
        let sent = provider.last_messages.lock().unwrap().clone();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].role, "system");
        assert_eq!(sent[1].content, "What's a zero-waste swap for paper towels?");

        assert_eq!(exchange.history().len(), 1);
        let turn = &exchange.history()[0];
        assert_eq!(turn.user_text, "What's a zero-waste swap for paper towels?");
        assert_eq!(turn.assistant_text, "Try compostable dishcloths.");
    }

    #[tokio::test]
    async fn test_history_replayed_on_followup() {
        let provider = Arc::new(RecordingProvider::new("b"));
        let mut exchange = exchange_with(provider.clone());

        exchange.ask("a1").await.unwrap();
        exchange.ask("a2").await.unwrap();

        let sent = provider.last_messages.lock().unwrap().clone();
        let roles: Vec<&str> = sent.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, ["system", "user", "assistant", "user"]);
        assert_eq!(sent[1].content, "a1");
        assert_eq!(sent[2].content, "b");
        assert_eq!(sent[3].content, "a2");
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_call() {
        let provider = Arc::new(RecordingProvider::new("unused"));
        let mut exchange = exchange_with(provider.clone());

        let err = exchange.ask("   ").await.unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Session(CoreError::Validation(_))
        ));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert!(exchange.history().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_drops_pending_and_keeps_history() {
        let provider = Arc::new(RecordingProvider::new("b1"));
        let mut exchange = exchange_with(provider);
        exchange.ask("a1").await.unwrap();

        exchange.provider = Arc::new(FailingProvider { rate_limited: true });
        let err = exchange.ask("a2").await.unwrap_err();

        assert!(matches!(
            err,
            ExchangeError::Completion(CompletionError::RateLimited { .. })
        ));
        assert!(err.user_notice().contains("wait a minute"));
        assert_eq!(exchange.history().len(), 1);
        assert!(exchange.session().pending().is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_session_retryable() {
        let mut exchange = exchange_with(Arc::new(FailingProvider { rate_limited: false }));

        let err = exchange.ask("a1").await.unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Completion(CompletionError::Api(_))
        ));
        assert!(exchange.history().is_empty());
        assert!(exchange.session().pending().is_none());

        // The same question can be resubmitted immediately
        exchange.provider = Arc::new(RecordingProvider::new("b1"));
        let reply = exchange.ask("a1").await.unwrap();
        assert_eq!(reply, "b1");
        assert_eq!(exchange.history().len(), 1);
    }

    #[tokio::test]
    async fn test_reset_clears_context() {
        let provider = Arc::new(RecordingProvider::new("b"));
        let mut exchange = exchange_with(provider.clone());

        exchange.ask("a1").await.unwrap();
        exchange.reset();
        assert!(exchange.history().is_empty());

        exchange.ask("a2").await.unwrap();
        let sent = provider.last_messages.lock().unwrap().clone();
        // Prompt starts from empty context again
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].content, "a2");
    }
}
