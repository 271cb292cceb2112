//! Per-visit conversation session
//!
//! A session is owned by exactly one interactive visit and is passed
//! explicitly into the exchange that drives it. There is no persistence
//! across visits: every process start begins with empty history.

mod store;

pub use store::{Session, Turn};
