use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP 503 from a model host that is still warming up. Retried internally.
    #[error("model at {endpoint} is loading")]
    ModelLoading { endpoint: String },

    #[error("model unavailable at {endpoint} after {attempts} attempts")]
    Unavailable { endpoint: String, attempts: u32 },

    #[error("HTTP {status} from {endpoint}: {body}")]
    Status {
        status: u16,
        endpoint: String,
        body: String,
    },

    #[error("failed to deserialize {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl InferenceError {
    /// Whether another attempt could succeed.
    #[must_use]
    pub(crate) fn is_retriable(&self) -> bool {
        matches!(
            self,
            InferenceError::Network { .. } | InferenceError::ModelLoading { .. }
        )
    }
}

/// Failures turning generative model output into a structured report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("no JSON object found in model response")]
    NoJsonFound,

    #[error("invalid JSON in model response: {0}")]
    InvalidJson(String),

    #[error("model response missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}
