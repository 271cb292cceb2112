//! OpenAI-compatible HTTP client

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::base::{
    Completion, CompletionError, CompletionProvider, CompletionResult, Message,
};
use eco_bestie_core::config::{AssistantConfig, ProviderConfig};

/// Chat completions request format
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

/// Chat completions response format
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct Usage {
    #[serde(default)]
    prompt_tokens: i64,
    #[serde(default)]
    completion_tokens: i64,
    #[serde(default)]
    total_tokens: i64,
}

/// OpenAI-compatible completion client
pub struct OpenAiClient {
    client: Client,
    api_base: String,
    api_key: Option<String>,
    default_model: String,
    extra_headers: HashMap<String, String>,
}

impl OpenAiClient {
    /// Create a new client
    pub fn new(
        api_key: Option<String>,
        api_base: Option<String>,
        default_model: String,
        extra_headers: Option<HashMap<String, String>>,
        timeout: Duration,
    ) -> Self {
        let api_base = api_base
            .and_then(|base| {
                let base = base.trim().trim_end_matches('/').to_string();
                if base.is_empty() {
                    None
                } else {
                    Some(base)
                }
            })
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string());

        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_base,
            api_key,
            default_model,
            extra_headers: extra_headers.unwrap_or_default(),
        }
    }

    /// Create a client from configuration
    pub fn from_config(provider: &ProviderConfig, assistant: &AssistantConfig) -> Self {
        let api_key = if provider.api_key.trim().is_empty() {
            None
        } else {
            Some(provider.api_key.clone())
        };
        Self::new(
            api_key,
            Some(provider.api_base.clone()),
            assistant.model.clone(),
            Some(provider.extra_headers.clone()),
            Duration::from_secs(assistant.request_timeout_seconds),
        )
    }

    fn apply_headers(&self, mut req_builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(api_key) = &self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        for (key, value) in &self.extra_headers {
            req_builder = req_builder.header(key, value);
        }

        req_builder
    }

    /// Parse the endpoint response into our standard format
    fn parse_response(&self, response: ChatCompletionResponse) -> CompletionResult<Completion> {
        let choice = response
            .choices
            .first()
            .ok_or_else(|| CompletionError::InvalidResponse("No choices in response".to_string()))?;

        let text = choice
            .message
            .content
            .as_deref()
            .ok_or_else(|| CompletionError::InvalidResponse("Choice has no content".to_string()))?
            .trim()
            .to_string();

        let mut usage = HashMap::new();
        usage.insert("prompt_tokens".to_string(), response.usage.prompt_tokens);
        usage.insert(
            "completion_tokens".to_string(),
            response.usage.completion_tokens,
        );
        usage.insert("total_tokens".to_string(), response.usage.total_tokens);

        Ok(Completion {
            text,
            finish_reason: choice
                .finish_reason
                .clone()
                .unwrap_or_else(|| "stop".to_string()),
            usage,
        })
    }

    fn retry_after(headers: &HeaderMap) -> Option<Duration> {
        headers
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(
        &self,
        messages: Vec<Message>,
        model: Option<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> CompletionResult<Completion> {
        let model = model.unwrap_or_else(|| self.default_model.clone());

        let request = ChatCompletionRequest {
            model: model.clone(),
            messages,
            max_tokens,
            temperature,
        };

        debug!(
            "Sending completion request to {} with model {}",
            self.api_base, model
        );

        let url = format!("{}/chat/completions", self.api_base);
        let req_builder = self.apply_headers(self.client.post(&url).json(&request));

        let response = req_builder.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = Self::retry_after(response.headers());
            warn!(
                "Completion endpoint rate limited (retry after {:?})",
                retry_after
            );
            return Err(CompletionError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CompletionError::Api(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let response_data: ChatCompletionResponse = response.json().await?;
        self.parse_response(response_data)
    }

    fn default_model(&self) -> String {
        self.default_model.clone()
    }
}
