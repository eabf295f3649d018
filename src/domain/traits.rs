use crate::domain::error::{ProviderError, ServiceError};
use crate::domain::model::ChatMessage;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Trait for chat model providers
///
/// One call sends an ordered list of role-tagged messages and returns the
/// text of a single completion. Implementations can be swapped (real HTTP
/// client, test double) without changing the gateway.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Provider identifier used in error details
    fn provider(&self) -> &str;

    async fn invoke(&self, messages: &[ChatMessage]) -> Result<String, ProviderError>;
}

/// Trait for the LLM gateway consumed by the translation service
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Generate raw text from a prompt and optional system prompt
    async fn generate_text(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, ServiceError>;

    /// Generate text and extract the JSON object it contains
    async fn generate_structured(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<Map<String, Value>, ServiceError>;
}
