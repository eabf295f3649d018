use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Error code for bad caller input
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
/// Error code for provider failures
pub const LLM_SERVICE_ERROR: &str = "LLM_SERVICE_ERROR";
/// Error code for model output that is not a JSON object
pub const LLM_RESPONSE_UNPARSEABLE: &str = "LLM_RESPONSE_UNPARSEABLE";
/// Error code for unexpected failures
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// Whether a failure is the caller's fault or ours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Client,
    Server,
}

/// Payload shared by every `ServiceError` kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorPayload {
    pub code: &'static str,
    pub message: String,
    pub details: Map<String, Value>,
}

impl ErrorPayload {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Map::new(),
        }
    }
}

/// Errors surfaced by the translation core.
///
/// Each kind carries the same payload shape; the HTTP boundary matches on the
/// variant to pick a status code.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("{}", .0.message)]
    Validation(ErrorPayload),

    #[error("{}", .0.message)]
    LlmService(ErrorPayload),

    #[error("{}", .0.message)]
    Internal(ErrorPayload),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(ErrorPayload::new(VALIDATION_ERROR, message))
    }

    /// Provider failure; `cause` is stringified into `original_error`
    pub fn llm_service(
        message: impl Into<String>,
        provider: &str,
        cause: impl std::fmt::Display,
    ) -> Self {
        Self::LlmService(ErrorPayload::new(LLM_SERVICE_ERROR, message))
            .with_detail("provider", provider)
            .with_detail("original_error", cause.to_string())
    }

    /// Model answered but nothing usable could be parsed out of it
    pub fn llm_unparseable(
        message: impl Into<String>,
        provider: &str,
        cause: impl std::fmt::Display,
        raw_response: &str,
    ) -> Self {
        let raw: String = raw_response.chars().take(500).collect();
        Self::LlmService(ErrorPayload::new(LLM_RESPONSE_UNPARSEABLE, message))
            .with_detail("provider", provider)
            .with_detail("original_error", cause.to_string())
            .with_detail("raw_response", raw)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(ErrorPayload::new(INTERNAL_ERROR, message))
    }

    /// Internal failure wrapping another error
    pub fn internal_from(message: impl Into<String>, cause: &dyn std::error::Error) -> Self {
        Self::internal(message).with_detail("original_error", cause.to_string())
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload_mut().details.insert(key.to_string(), value.into());
        self
    }

    pub fn payload(&self) -> &ErrorPayload {
        match self {
            Self::Validation(p) | Self::LlmService(p) | Self::Internal(p) => p,
        }
    }

    fn payload_mut(&mut self) -> &mut ErrorPayload {
        match self {
            Self::Validation(p) | Self::LlmService(p) | Self::Internal(p) => p,
        }
    }

    pub fn code(&self) -> &'static str {
        self.payload().code
    }

    pub fn message(&self) -> &str {
        &self.payload().message
    }

    pub fn details(&self) -> &Map<String, Value> {
        &self.payload().details
    }

    pub fn status_class(&self) -> StatusClass {
        match self {
            Self::Validation(_) => StatusClass::Client,
            Self::LlmService(_) | Self::Internal(_) => StatusClass::Server,
        }
    }

    /// HTTP status equivalent of this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::LlmService(_) => 503,
            Self::Internal(_) => 500,
        }
    }
}

/// Raw failures reported by a chat model provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode provider response: {0}")]
    Decode(String),

    #[error("Provider returned no choices")]
    EmptyResponse,
}

/// Start-up and process level failures
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Start-up error: {0}")]
    Init(#[from] ServiceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(
            ServiceError::validation("bad").status_class(),
            StatusClass::Client
        );
        assert_eq!(ServiceError::validation("bad").status_code(), 400);
        assert_eq!(
            ServiceError::llm_service("down", "qwen", "timeout").status_code(),
            503
        );
        assert_eq!(ServiceError::internal("oops").status_code(), 500);
        assert_eq!(
            ServiceError::internal("oops").status_class(),
            StatusClass::Server
        );
    }

    #[test]
    fn test_llm_service_details() {
        let err = ServiceError::llm_service("Failed", "qwen", "connection refused");
        assert_eq!(err.code(), LLM_SERVICE_ERROR);
        assert_eq!(err.details()["provider"], "qwen");
        assert_eq!(err.details()["original_error"], "connection refused");
    }

    #[test]
    fn test_unparseable_truncates_raw_response() {
        let raw = "字".repeat(800);
        let err = ServiceError::llm_unparseable("bad json", "qwen", "eof", &raw);
        assert_eq!(err.code(), LLM_RESPONSE_UNPARSEABLE);
        let kept = err.details()["raw_response"].as_str().unwrap_or_default();
        assert_eq!(kept.chars().count(), 500);
    }

    #[test]
    fn test_display_is_message() {
        let err = ServiceError::internal("Text cannot be empty");
        assert_eq!(err.to_string(), "Text cannot be empty");
    }
}
