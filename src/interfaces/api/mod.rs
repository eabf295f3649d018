pub mod health;
pub mod response;
pub mod translate;

use crate::state::AppState;
use axum::http::{header, Method, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the application router with every `/api` route
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api = Router::new()
        .route("/translate", post(translate::translate))
        .route("/translate/batch", post(translate::batch_translate))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/info", get(health::service_info))
        .method_not_allowed_fallback(method_not_allowed)
        .layer(cors);

    Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> Response {
    response::simple_error(
        StatusCode::NOT_FOUND,
        "NOT_FOUND",
        "The requested resource was not found",
    )
}

async fn method_not_allowed() -> Response {
    response::simple_error(
        StatusCode::METHOD_NOT_ALLOWED,
        "METHOD_NOT_ALLOWED",
        "The method is not allowed for the requested URL",
    )
}
