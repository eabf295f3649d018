// Health check and service info endpoints
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "aitranslator",
        "environment": state.config.app.env,
        "version": SERVICE_VERSION,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /api/ready
///
/// The gateway is built at start-up, so a running server always has one.
pub async fn readiness_check() -> Json<Value> {
    Json(json!({
        "status": "ready",
        "checks": {"llm_service": "available"},
    }))
}

/// GET /api/info
pub async fn service_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": state.config.app.name,
        "version": SERVICE_VERSION,
        "description": "AI-powered Chinese to English translation service",
        "environment": state.config.app.env,
        "endpoints": [
            {
                "path": "/api/translate",
                "method": "POST",
                "description": "Translate Chinese text to English"
            },
            {
                "path": "/api/translate/batch",
                "method": "POST",
                "description": "Translate several texts in order"
            },
            {"path": "/api/health", "method": "GET", "description": "Health check endpoint"},
            {"path": "/api/ready", "method": "GET", "description": "Readiness check endpoint"},
            {"path": "/api/info", "method": "GET", "description": "Service information"},
        ],
    }))
}
