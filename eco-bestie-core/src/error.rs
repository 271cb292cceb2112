//! Error types for eco-bestie

use thiserror::Error;

/// The main error type for eco-bestie operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Rejected user input (empty or whitespace-only)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session sequencing errors, e.g. resolving a turn that is not pending
    #[error("Session state error: {0}")]
    State(String),

    /// Catalog errors
    #[error("Catalog error: {0}")]
    Catalog(String),
}

/// A specialized Result type for eco-bestie operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
