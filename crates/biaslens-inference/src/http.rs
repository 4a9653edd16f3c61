use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::error::InferenceError;

/// Longest slice of an error body kept in [`InferenceError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 300;

/// One authenticated JSON POST. Returns the raw body of a 2xx response.
///
/// 503 maps to [`InferenceError::ModelLoading`] so the retry policy can tell
/// it apart from other statuses.
pub(crate) async fn post_json<B: Serialize + ?Sized>(
    client: &Client,
    endpoint: &str,
    api_key: &str,
    body: &B,
) -> Result<String, InferenceError> {
    let network = |source| InferenceError::Network {
        endpoint: endpoint.to_string(),
        source,
    };

    let response = client
        .post(endpoint)
        .bearer_auth(api_key)
        .json(body)
        .send()
        .await
        .map_err(network)?;

    let status = response.status();
    if status == StatusCode::SERVICE_UNAVAILABLE {
        return Err(InferenceError::ModelLoading {
            endpoint: endpoint.to_string(),
        });
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(InferenceError::Status {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
            body: crate::truncate_chars(&text, MAX_ERROR_BODY_CHARS).to_string(),
        });
    }

    response.text().await.map_err(network)
}
