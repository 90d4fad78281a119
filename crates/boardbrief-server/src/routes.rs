use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use tower_http::limit::RequestBodyLimitLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::dto::{ErrorResponse, HealthResponse};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/summarize", post(summarize))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.max_body_bytes));

    let public = Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public.merge(api).with_state(state)
}

// ---------------------------------------------------------------------------
// Summarize
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/summarize",
    request_body(content = String, description = "Raw page HTML", content_type = "text/html"),
    responses(
        (status = 200, description = "Comparison report: text_length, models_compared, and one result per model in configured order"),
        (status = 400, description = "Empty body or too little text", body = ErrorResponse),
        (status = 413, description = "Body exceeds the configured limit"),
    ),
    tag = "summarize"
)]
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        let body = ErrorResponse {
            error: "bad_request".to_string(),
            message: "Missing request body".to_string(),
        };
        return Ok((StatusCode::BAD_REQUEST, axum::Json(body)).into_response());
    }

    // Pages occasionally carry stray non-UTF-8 bytes; extraction is best-effort anyway.
    let html = String::from_utf8_lossy(&body);
    let report = state.service.summarize(&html).await?;

    Ok(axum::Json(report).into_response())
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy",
        models: state.service.comparator().models().len(),
    };

    (StatusCode::OK, axum::Json(response))
}
