//! Session data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// One completed exchange: a user message paired with its assistant reply.
///
/// Created when a reply resolves; immutable thereafter. Turns are never
/// deleted individually, only a whole-session reset clears them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// What the user asked
    pub user_text: String,
    /// What the assistant answered
    pub assistant_text: String,
    /// When the reply resolved
    pub created_at: DateTime<Utc>,
}

/// The ordered turn history for one visit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Visit handle
    pub id: Uuid,
    /// Completed turns in append order
    turns: Vec<Turn>,
    /// User text awaiting its assistant reply, if any
    pending: Option<String>,
    /// Session creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new empty session
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            turns: Vec::new(),
            pending: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record new user input as the pending turn.
    ///
    /// The text is trimmed first; empty or whitespace-only input is
    /// rejected before any external call is made. Only one input may be
    /// outstanding at a time.
    pub fn append_user(&mut self, text: impl AsRef<str>) -> Result<()> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(Error::Validation("input is empty".to_string()));
        }
        if self.pending.is_some() {
            return Err(Error::State("a turn is already pending".to_string()));
        }
        self.pending = Some(text.to_string());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Fill the assistant half of the pending turn, completing it.
    pub fn resolve_pending(&mut self, reply_text: impl Into<String>) -> Result<()> {
        let user_text = self
            .pending
            .take()
            .ok_or_else(|| Error::State("no pending turn to resolve".to_string()))?;
        let now = Utc::now();
        self.turns.push(Turn {
            user_text,
            assistant_text: reply_text.into(),
            created_at: now,
        });
        self.updated_at = now;
        Ok(())
    }

    /// Discard the pending input without recording a turn.
    ///
    /// Failure path: the session must never stay stuck pending across
    /// interactions, so every failed call either resolves or drops.
    pub fn drop_pending(&mut self) {
        if self.pending.take().is_some() {
            self.updated_at = Utc::now();
        }
    }

    /// The user text currently awaiting a reply
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Completed turns in append order; the pending turn is excluded
    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    /// Clear all turns and any pending input
    pub fn reset(&mut self) {
        self.turns.clear();
        self.pending = None;
        self.updated_at = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_starts_empty() {
        let session = Session::new();
        assert!(session.history().is_empty());
        assert!(session.pending().is_none());
    }

    #[test]
    fn test_append_then_resolve_grows_history_by_one() {
        let mut session = Session::new();
        let before = session.history().len();

        session.append_user("How do I start composting?").unwrap();
        assert_eq!(session.history().len(), before);
        session.resolve_pending("Start with a small counter bin.").unwrap();

        assert_eq!(session.history().len(), before + 1);
        let turn = &session.history()[0];
        assert_eq!(turn.user_text, "How do I start composting?");
        assert_eq!(turn.assistant_text, "Start with a small counter bin.");
    }

    #[test]
    fn test_append_trims_whitespace() {
        let mut session = Session::new();
        session.append_user("  hello  \n").unwrap();
        assert_eq!(session.pending(), Some("hello"));
    }

    #[test]
    fn test_empty_input_rejected_and_history_unchanged() {
        let mut session = Session::new();
        session.append_user("first").unwrap();
        session.resolve_pending("reply").unwrap();

        for bad in ["", "   ", "\t\n"] {
            let err = session.append_user(bad).unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
            assert_eq!(session.history().len(), 1);
            assert!(session.pending().is_none());
        }
    }

    #[test]
    fn test_double_append_rejected() {
        let mut session = Session::new();
        session.append_user("one").unwrap();
        let err = session.append_user("two").unwrap_err();
        assert!(matches!(err, Error::State(_)));
        assert_eq!(session.pending(), Some("one"));
    }

    #[test]
    fn test_resolve_without_pending_is_state_error() {
        let mut session = Session::new();
        let err = session.resolve_pending("ghost reply").unwrap_err();
        assert!(matches!(err, Error::State(_)));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_drop_pending_leaves_history_unchanged() {
        let mut session = Session::new();
        session.append_user("a1").unwrap();
        session.resolve_pending("b1").unwrap();
        session.append_user("a2").unwrap();

        session.drop_pending();

        assert!(session.pending().is_none());
        assert_eq!(session.history().len(), 1);
        // Dropping again is a no-op
        session.drop_pending();
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_reset_always_yields_empty_history() {
        let mut session = Session::new();
        session.reset();
        assert!(session.history().is_empty());

        session.append_user("a1").unwrap();
        session.resolve_pending("b1").unwrap();
        session.append_user("a2").unwrap();
        session.reset();

        assert!(session.history().is_empty());
        assert!(session.pending().is_none());
    }

    #[test]
    fn test_history_is_idempotent() {
        let mut session = Session::new();
        session.append_user("a1").unwrap();
        session.resolve_pending("b1").unwrap();

        let first: Vec<Turn> = session.history().to_vec();
        let second: Vec<Turn> = session.history().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_turn_order_preserved() {
        let mut session = Session::new();
        for i in 0..5 {
            session.append_user(format!("question {i}")).unwrap();
            session.resolve_pending(format!("answer {i}")).unwrap();
        }
        for (i, turn) in session.history().iter().enumerate() {
            assert_eq!(turn.user_text, format!("question {i}"));
            assert_eq!(turn.assistant_text, format!("answer {i}"));
        }
    }
}
