use crate::domain::error::ServiceError;
use crate::domain::model::{invalid_field, is_empty_body, TranslationRequest, TranslationResult};
use crate::interfaces::api::response::ApiError;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

/// Most texts accepted by one batch request
pub const MAX_BATCH_ITEMS: usize = 50;

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub results: Vec<TranslationResult>,
}

/// Decode a request body as JSON regardless of its content type
fn parse_body(body: &Bytes) -> Result<Value, ServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ServiceError::validation("Request body cannot be empty"));
    }
    serde_json::from_slice(body).map_err(|e| {
        ServiceError::validation("Request body must be valid JSON")
            .with_detail("reason", e.to_string())
    })
}

/// POST /api/translate
pub async fn translate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TranslationResult>, ApiError> {
    let expose = state.config.app.expose_error_details();
    let span = tracing::info_span!("translate", request_id = %Uuid::new_v4());

    async move {
        let request = parse_body(&body)
            .and_then(|value| TranslationRequest::from_json(&value))
            .map_err(|e| ApiError::new(e, expose))?;

        tracing::info!(text_len = request.text().chars().count(), "Translation request received");

        let result = state
            .translator
            .translate(request.text())
            .await
            .map_err(|e| ApiError::new(e, expose))?;

        tracing::info!("Translation completed successfully");
        Ok(Json(result))
    }
    .instrument(span)
    .await
}

/// POST /api/translate/batch
pub async fn batch_translate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BatchResponse>, ApiError> {
    let expose = state.config.app.expose_error_details();
    let span = tracing::info_span!("batch_translate", request_id = %Uuid::new_v4());

    async move {
        let texts = parse_body(&body)
            .and_then(|value| batch_texts(&value))
            .map_err(|e| ApiError::new(e, expose))?;

        tracing::info!(items = texts.len(), "Batch translation request received");

        let results = state.translator.batch_translate(&texts).await;
        Ok(Json(BatchResponse { results }))
    }
    .instrument(span)
    .await
}

/// Validate `{"texts": [..]}` and return the trimmed texts
fn batch_texts(body: &Value) -> Result<Vec<String>, ServiceError> {
    if is_empty_body(body) {
        return Err(ServiceError::validation("Request body cannot be empty"));
    }
    let items = match body.get("texts") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(invalid_field(
                "texts",
                vec!["Input should be a valid list".to_string()],
            ))
        }
        None => return Err(invalid_field("texts", vec!["Field required".to_string()])),
    };
    if items.is_empty() || items.len() > MAX_BATCH_ITEMS {
        return Err(invalid_field(
            "texts",
            vec![format!(
                "List should have between 1 and {} items",
                MAX_BATCH_ITEMS
            )],
        ));
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let field = format!("texts[{}]", i);
            match item {
                Value::String(text) => TranslationRequest::new(text)
                    .map(TranslationRequest::into_text)
                    .map_err(|e| e.with_detail("field", field)),
                _ => Err(invalid_field(
                    &field,
                    vec!["Input should be a valid string".to_string()],
                )),
            }
        })
        .collect()
}
