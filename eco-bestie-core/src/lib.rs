//! Core types and utilities for eco-bestie
//!
//! This crate provides the error taxonomy, configuration, logging
//! bootstrap, per-visit session store, and tip catalog used by the
//! other eco-bestie components.

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use error::{Error, Result};
