use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use biaslens_history::HistoryEntry;
use serde_json::json;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

pub(super) async fn list_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.load().await)
}

/// Non-numeric ids get the same 404 as unknown ones.
pub(super) async fn delete_history_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let not_found = (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": "Item not found." })),
    );
    let Ok(id) = raw_id.parse::<i64>() else {
        return Ok(not_found);
    };

    match state.history.delete_by_id(id).await {
        Ok(true) => Ok((StatusCode::OK, Json(json!({ "success": true })))),
        Ok(false) => Ok(not_found),
        Err(e) => Err(ApiError::new(req_id.0, "internal_error", e.to_string())),
    }
}

pub(super) async fn clear_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .history
        .clear()
        .await
        .map_err(|e| ApiError::new(req_id.0, "internal_error", e.to_string()))?;
    Ok(Json(json!({ "success": true })))
}
