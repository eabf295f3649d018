use crate::domain::error::ServiceError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Longest accepted input, counted in characters
pub const MAX_TEXT_CHARS: usize = 10_000;

// 已校验的翻译请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    text: String,
}

impl TranslationRequest {
    /// Validate a raw text value: 1..=10000 characters, not blank.
    ///
    /// The stored text is trimmed.
    pub fn new(text: &str) -> Result<Self, ServiceError> {
        let mut errors = Vec::new();
        let len = text.chars().count();
        if len == 0 {
            errors.push("String should have at least 1 character".to_string());
        } else if len > MAX_TEXT_CHARS {
            errors.push(format!(
                "String should have at most {} characters",
                MAX_TEXT_CHARS
            ));
        } else if text.trim().is_empty() {
            errors.push("Text cannot be empty or contain only whitespace".to_string());
        }

        if !errors.is_empty() {
            return Err(invalid_field("text", errors));
        }

        Ok(Self {
            text: text.trim().to_string(),
        })
    }

    /// Validate a decoded JSON request body of shape `{"text": "..."}`
    pub fn from_json(body: &Value) -> Result<Self, ServiceError> {
        if is_empty_body(body) {
            return Err(ServiceError::validation("Request body cannot be empty"));
        }
        match body.get("text") {
            Some(Value::String(text)) => Self::new(text),
            Some(_) => Err(invalid_field(
                "text",
                vec!["Input should be a valid string".to_string()],
            )),
            None => Err(invalid_field("text", vec!["Field required".to_string()])),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// True for bodies that carry nothing: `null`, `{}`, `[]`, `""`
pub fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

pub(crate) fn invalid_field(field: &str, errors: Vec<String>) -> ServiceError {
    ServiceError::validation("Invalid request parameters")
        .with_detail("field", field)
        .with_detail("errors", json!(errors))
}

// 翻译结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translation: String,
    pub keywords: Vec<String>,
}

impl TranslationResult {
    pub fn new(translation: String, keywords: Vec<String>) -> Self {
        Self {
            translation,
            keywords,
        }
    }
}

/// Role of a chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single role-tagged message sent to the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}
