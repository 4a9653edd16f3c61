use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use biaslens_analysis::{AggregatedResult, AnalysisError};
use biaslens_core::InputType;
use biaslens_history::HistoryEntry;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    #[serde(default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub input_value: Option<String>,
}

pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AggregatedResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new(req_id.0.clone(), "unsupported_media_type", "Request must be JSON")
        }
        other => ApiError::new(req_id.0.clone(), "bad_request", other.body_text()),
    })?;

    let input_type = request
        .input_type
        .as_deref()
        .and_then(InputType::parse)
        .ok_or_else(|| {
            ApiError::new(req_id.0.clone(), "bad_request", "Invalid input_type specified")
        })?;
    let input_value = request
        .input_value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            ApiError::new(req_id.0.clone(), "bad_request", "Input value cannot be empty")
        })?;

    tracing::info!(request_id = %req_id.0, input_type = %input_type, "analysis requested");
    let result = state
        .analyzer
        .analyze(input_type, input_value)
        .await
        .map_err(|e| map_analysis_error(req_id.0.clone(), &e))?;

    let entry = HistoryEntry::from_result(input_type, input_value, &result);
    if let Err(e) = state.history.append(entry).await {
        tracing::warn!(request_id = %req_id.0, error = %e, "failed to save analysis to history");
    }

    Ok(Json(result))
}

fn map_analysis_error(request_id: String, error: &AnalysisError) -> ApiError {
    match error {
        AnalysisError::EmptyInput => {
            ApiError::new(request_id, "bad_request", "Input value cannot be empty")
        }
        other => ApiError::new(request_id, "analysis_failed", other.to_string()),
    }
}
