use crate::domain::error::ServiceError;
use crate::domain::model::ChatMessage;
use crate::domain::traits::{ChatModel, LlmGateway};
use crate::infrastructure::config::LlmConfig;
use crate::infrastructure::network::client::OpenAiCompatibleClient;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Gateway over a chat model provider.
///
/// Holds only immutable state, so one instance can be shared across
/// concurrent requests. One provider call per operation, no retries.
pub struct LlmService {
    model: Arc<dyn ChatModel>,
}

impl LlmService {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        tracing::info!(provider = model.provider(), "LLM service initialized");
        Self { model }
    }

    /// Build the gateway with the default OpenAI-compatible client
    pub fn from_config(config: &LlmConfig) -> Result<Self, ServiceError> {
        let client = OpenAiCompatibleClient::new(config).inspect_err(|e| {
            tracing::error!(error = %e, details = ?e.details(), "Failed to create LLM model");
        })?;
        tracing::info!(model = client.model(), "Using chat model");
        Ok(Self::new(Arc::new(client)))
    }

    pub fn provider(&self) -> &str {
        self.model.provider()
    }
}

#[async_trait]
impl LlmGateway for LlmService {
    async fn generate_text(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, ServiceError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt.filter(|s| !s.is_empty()) {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        tracing::debug!(prompt_len = prompt.chars().count(), "Sending request to LLM");

        match self.model.invoke(&messages).await {
            Ok(content) => {
                tracing::info!(
                    response_len = content.chars().count(),
                    "LLM request completed"
                );
                Ok(content)
            }
            Err(e) => {
                tracing::error!(error = %e, "LLM generation failed");
                Err(ServiceError::llm_service(
                    "Failed to generate response from LLM",
                    self.provider(),
                    e,
                ))
            }
        }
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<Map<String, Value>, ServiceError> {
        let response_text = self.generate_text(prompt, system_prompt).await?;
        parse_json_object(&response_text).map_err(|cause| {
            tracing::error!(error = %cause, "Failed to parse LLM response as JSON");
            tracing::debug!(
                response = %truncate_chars(&response_text, 500),
                "Unparseable response"
            );
            ServiceError::llm_unparseable(
                "LLM response could not be parsed as JSON",
                self.provider(),
                cause,
                &response_text,
            )
        })
    }
}

/// Locate the greedy `{ ... }` span: first `{` through the last `}` after it
pub fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse the JSON object embedded in a model response.
///
/// With a brace span present only that span is parsed; otherwise the whole
/// text is tried. Anything other than a JSON object is rejected.
pub fn parse_json_object(text: &str) -> Result<Map<String, Value>, String> {
    let candidate = match extract_json_span(text) {
        Some(span) => {
            tracing::debug!(span = %truncate_chars(span, 100), "Extracted JSON from response");
            span
        }
        None => {
            tracing::warn!("No JSON pattern found, attempting to parse entire response");
            text
        }
    };

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, got {}", json_kind(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
