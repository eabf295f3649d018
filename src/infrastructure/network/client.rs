use crate::domain::error::{ProviderError, ServiceError};
use crate::domain::model::ChatMessage;
use crate::domain::traits::ChatModel;
use crate::infrastructure::config::LlmConfig;
use crate::infrastructure::network::http::create_client;
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Provider identifier reported in error details
pub const PROVIDER_QWEN: &str = "qwen";

// OpenAI-compatible chat completion structures
#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorDetail {
    message: String,
}

/// Chat client for OpenAI-compatible endpoints (DashScope compatible mode by default)
///
/// NOTE: no `Debug` derive, `auth_header` holds the API key.
pub struct OpenAiCompatibleClient {
    client: Client,
    provider: String,
    auth_header: HeaderValue,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiCompatibleClient {
    /// Build the client; failures here are start-up fatal, never retried
    pub fn new(config: &LlmConfig) -> Result<Self, ServiceError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(ServiceError::llm_service(
                "Failed to initialize LLM model",
                PROVIDER_QWEN,
                "API key is not configured",
            ));
        }

        let mut auth_header = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
            ServiceError::llm_service(
                "Failed to initialize LLM model",
                PROVIDER_QWEN,
                format!("API key is not a valid header value: {}", e),
            )
        })?;
        auth_header.set_sensitive(true);

        let client = create_client(Duration::from_millis(config.timeout_ms)).map_err(|e| {
            ServiceError::llm_service("Failed to initialize LLM model", PROVIDER_QWEN, e)
        })?;

        tracing::debug!(
            base_url = %config.api_base,
            model = %config.model,
            "Creating chat model client"
        );

        Ok(Self {
            client,
            provider: PROVIDER_QWEN.to_string(),
            auth_header,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatibleClient {
    fn provider(&self) -> &str {
        &self.provider
    }

    async fn invoke(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body_text)
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.message)
                .unwrap_or(body_text);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        // A choice with null content is an empty answer, not a failure
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)?;
        Ok(choice.message.content.unwrap_or_default())
    }
}
