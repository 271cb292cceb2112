//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration for eco-bestie
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Assistant defaults (model, sampling, persona)
    pub assistant: AssistantConfig,
    /// Completion endpoint configuration
    pub provider: ProviderConfig,
    /// Tip/product catalog configuration
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Assistant defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Model name
    pub model: String,
    /// Maximum output tokens per reply
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Persona id selecting the system prompt
    pub persona: String,
    /// External call timeout in seconds
    pub request_timeout_seconds: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 300,
            temperature: 0.7,
            persona: "coach".to_string(),
            request_timeout_seconds: 60,
        }
    }
}

/// Completion endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub extra_headers: HashMap<String, String>,
    /// Serve canned tips without calling the endpoint (no credits used)
    #[serde(default)]
    pub offline: bool,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            extra_headers: HashMap::new(),
            offline: false,
        }
    }
}

/// Tip/product catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Optional YAML file replacing the built-in entries
    #[serde(default)]
    pub path: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Module-specific overrides
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
            overrides: HashMap::new(),
        }
    }
}
