//! Configuration loading and schema

pub mod loader;
pub mod schema;
pub mod validate;

pub use loader::ConfigLoader;
pub use schema::{AssistantConfig, CatalogConfig, Config, LoggingConfig, ProviderConfig};
