//! Chat completion client implementation
//!
//! Async HTTP client for an OpenAI-compatible `/chat/completions` endpoint.
//! Every call is a single attempt: no retry, no fallback model, no cache.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, info, warn};

use crate::config::{ApiKey, LlmConfig};
use crate::error::{Error, Result};

use super::provider::SummarizationProvider;
use super::types::{ChatRequest, ChatResponse, FinishReason, LlmResponse, Message};

/// Chat completion client
///
/// Holds no mutable state, so one instance can serve concurrent calls.
#[derive(Clone)]
pub struct LlmClient {
    /// HTTP client for making requests
    http_client: HttpClient,
    /// Model identifier sent with every request
    model: String,
    /// Credential injected at construction, read-only afterwards
    api_key: ApiKey,
    /// Base URL for the API, without trailing slash
    base_url: String,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key)
            .finish()
    }
}

/// Builder for creating an LlmClient
#[derive(Default)]
pub struct LlmClientBuilder {
    config: Option<LlmConfig>,
    api_key: Option<ApiKey>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl LlmClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the LLM configuration (model, base URL, timeout)
    pub fn config(mut self, config: LlmConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn api_key(mut self, api_key: ApiKey) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Override the base URL from the configuration
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Override the request timeout from the configuration
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn build(self) -> Result<LlmClient> {
        let config = self.config.unwrap_or_default();
        let api_key = self.api_key.ok_or_else(|| {
            Error::ConfigError(
                "API key is required. Set PARTICLES_API_KEY or OPENAI_API_KEY.".to_string(),
            )
        })?;

        let timeout_secs = self.timeout_secs.unwrap_or(config.timeout_secs);

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = self.base_url.unwrap_or(config.base_url);

        Ok(LlmClient {
            http_client,
            model: config.model,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl LlmClient {
    /// Create a new LlmClient with the given configuration and API key
    pub fn new(config: LlmConfig, api_key: ApiKey) -> Result<Self> {
        LlmClientBuilder::new().config(config).api_key(api_key).build()
    }

    pub fn builder() -> LlmClientBuilder {
        LlmClientBuilder::new()
    }

    /// Model identifier sent with each request
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a single chat completion request
    pub async fn chat(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<LlmResponse> {
        let request = ChatRequest::new(&self.model, messages)
            .with_temperature(temperature)
            .with_max_tokens(max_tokens);

        self.send_request(&request).await
    }

    /// Send a single request to the API
    async fn send_request(&self, request: &ChatRequest) -> Result<LlmResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            max_tokens = ?request.max_tokens,
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            return self.handle_error_response(status, response).await;
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Completion(format!("Failed to parse response: {}", e)))?;

        let llm_response = LlmResponse::from_chat_response(chat_response)
            .ok_or_else(|| Error::Completion("Empty response from API".to_string()))?;

        if llm_response.finish_reason == FinishReason::Length {
            warn!(
                max_tokens = ?request.max_tokens,
                "Completion stopped at the token budget; output may be cut short"
            );
        }

        info!(
            model = %llm_response.model,
            input_tokens = llm_response.input_tokens,
            output_tokens = llm_response.output_tokens,
            finish_reason = %llm_response.finish_reason,
            "Chat completion successful"
        );

        Ok(llm_response)
    }

    /// Handle error responses from the API
    async fn handle_error_response<T>(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> Result<T> {
        let body = response.text().await.unwrap_or_default();
        let detail = extract_error_message(&body).unwrap_or(body);

        warn!(status = status.as_u16(), "Chat completion request failed");

        let message = match status.as_u16() {
            401 => "Unauthorized: Invalid API key. Set PARTICLES_API_KEY or OPENAI_API_KEY environment variable.".to_string(),
            429 => format!("Rate limited or quota exceeded: {}", detail),
            400 => format!("Bad request: {}", detail),
            402 => "Payment required: Insufficient credits on the account".to_string(),
            403 => format!("Forbidden: {}", detail),
            404 => format!("Model not found or endpoint unavailable: {}", detail),
            500..=599 => format!("Server error ({}): {}", status, detail),
            _ => format!("HTTP error {}: {}", status, detail),
        };

        Err(Error::Completion(message))
    }
}

#[async_trait]
impl SummarizationProvider for LlmClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<String> {
        let messages = vec![Message::system(system_prompt), Message::user(user_prompt)];
        let response = self.chat(messages, temperature, max_tokens).await?;
        Ok(response.content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Pull `error.message` out of an OpenAI-style error body
fn extract_error_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;
    json.get("error")
        .and_then(|error| error.get("message").or(Some(error)))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .or_else(|| {
            json.get("message")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
}
