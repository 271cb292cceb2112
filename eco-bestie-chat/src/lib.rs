//! Prompt assembly and exchange orchestration for eco-bestie
//!
//! Ties one visit's session to the completion boundary: persona lookup,
//! ordered prompt assembly, and the append/resolve/drop lifecycle of each
//! turn.

pub mod context;
pub mod exchange;
pub mod persona;

pub use context::ContextBuilder;
pub use exchange::{ChatExchange, ExchangeError, SamplingParams};
pub use persona::{PersonaRegistry, PersonaSpec};
