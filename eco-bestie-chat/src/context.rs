//! Context builder for assembling prompts

use eco_bestie_core::session::Turn;
use eco_bestie_providers::Message;

/// Builds the ordered message list for completion requests
#[derive(Debug)]
pub struct ContextBuilder {
    system_prompt: String,
}

impl ContextBuilder {
    /// Create a new context builder with the persona's system prompt
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    /// The persona text this builder prepends
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Build the complete message list for a completion call.
    ///
    /// The endpoint is stateless between calls and order-sensitive, so
    /// the sequence is exactly: system, then each completed turn as a
    /// user/assistant pair in append order, then the new user text.
    pub fn build_messages(&self, history: &[Turn], new_text: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() * 2 + 2);

        messages.push(Message::system(&self.system_prompt));

        for turn in history {
            messages.push(Message::user(&turn.user_text));
            messages.push(Message::assistant(&turn.assistant_text));
        }

        messages.push(Message::user(new_text));

        messages
    }
}
