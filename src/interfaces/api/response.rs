// HTTP error mapping
use crate::domain::error::{ServiceError, StatusClass};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'a Map<String, Value>>,
}

/// A `ServiceError` on its way out of a handler
///
/// `details` are only written when `expose_details` is set (non-production).
#[derive(Debug)]
pub struct ApiError {
    pub error: ServiceError,
    pub expose_details: bool,
}

impl ApiError {
    pub fn new(error: ServiceError, expose_details: bool) -> Self {
        Self {
            error,
            expose_details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self.error.status_class() {
            StatusClass::Client => {
                tracing::warn!(
                    code = self.error.code(),
                    error_message = self.error.message(),
                    "Request rejected"
                )
            }
            StatusClass::Server => {
                tracing::error!(
                    code = self.error.code(),
                    error_message = self.error.message(),
                    details = ?self.error.details(),
                    "Request failed"
                )
            }
        }

        let details = self.error.details();
        let body = ErrorBody {
            error: self.error.code(),
            message: self.error.message(),
            details: (self.expose_details && !details.is_empty()).then_some(details),
        };
        (status, Json(body)).into_response()
    }
}

/// Plain JSON error for routing failures (404 / 405)
pub fn simple_error(status: StatusCode, error: &str, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error,
            message,
            details: None,
        }),
    )
        .into_response()
}
