use biaslens_inference::InferenceError;
use biaslens_scraper::{FetchError, SearchError, TopicError};
use thiserror::Error;

/// Failures that abort a whole analysis request.
///
/// Per-signal failures never show up here; they are folded into the
/// per-article result instead.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("input value must not be empty")]
    EmptyInput,

    #[error("Scraping failed: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Topic(#[from] TopicError),

    #[error("No analysis results were generated.")]
    NoResults,

    #[error("search provider setup failed: {0}")]
    SearchSetup(#[from] SearchError),

    #[error("model client setup failed: {0}")]
    InferenceSetup(#[from] InferenceError),
}
