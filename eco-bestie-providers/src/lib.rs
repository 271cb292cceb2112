//! Completion provider boundary for eco-bestie
//!
//! The external text-generation service is an opaque collaborator: this
//! crate defines the message shapes sent to it, the classified errors
//! coming back, and the clients that speak to it (or pretend to, in
//! offline mode).

pub mod base;
pub mod offline;
pub mod openai;

pub use base::{
    Completion, CompletionError, CompletionProvider, CompletionResult, Message,
};
pub use offline::OfflineClient;
pub use openai::OpenAiClient;
