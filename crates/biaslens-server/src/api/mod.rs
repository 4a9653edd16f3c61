mod analyze;
mod history;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use biaslens_analysis::Analyzer;
use biaslens_history::HistoryStore;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, REQUEST_ID_HEADER};
use crate::page;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub history: Arc<HistoryStore>,
}

/// Error response. Serialized as `{"error": message}`; the status comes from
/// `code`.
#[derive(Debug)]
pub struct ApiError {
    pub request_id: String,
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn new(request_id: impl Into<String>, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            code,
            message: message.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self.code {
            "bad_request" => StatusCode::BAD_REQUEST,
            "not_found" => StatusCode::NOT_FOUND,
            "unsupported_media_type" => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(request_id = %self.request_id, code = self.code, error = %self.message, "request failed");
        } else {
            tracing::debug!(request_id = %self.request_id, code = self.code, error = %self.message, "request rejected");
        }
        (
            status,
            Json(ErrorBody {
                error: &self.message,
            }),
        )
            .into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

fn limited_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze::analyze))
        .route("/history", get(history::list_history))
        .route("/history/delete/{id}", delete(history::delete_history_item))
        .route("/history/clear", delete(history::clear_history))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new()
        .route("/", get(page::index))
        .route("/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(limited_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
