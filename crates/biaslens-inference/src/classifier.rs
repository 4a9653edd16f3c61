use std::time::Duration;

use biaslens_core::{AppConfig, BiasLabel, SentimentLabel};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;
use crate::retry::RetryPolicy;
use crate::types::{probability_to_percent, BiasSignal, SentimentSignal};

/// Classifier inputs are cut to this many characters.
pub const MAX_CLASSIFIER_INPUT_CHARS: usize = 1000;

#[derive(Debug, Serialize)]
struct ClassifierRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Hosted text-classification models exist in two shapes: a batch of one
/// (`[[{..}]]`) and a flat list (`[{..}]`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifierResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassifierResponse {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            ClassifierResponse::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
            ClassifierResponse::Flat(scores) => scores,
        }
    }
}

/// Translation from a model's raw sentiment labels to [`SentimentLabel`].
///
/// Models that emit `positive`/`negative`/`neutral` need no map. Entries
/// are matched case-insensitively and take precedence over those names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentimentLabelMap(Vec<(String, SentimentLabel)>);

impl SentimentLabelMap {
    /// Labels of the three-class `cardiffnlp/twitter-roberta-base-sentiment`
    /// model.
    #[must_use]
    pub fn cardiff() -> Self {
        Self(vec![
            ("LABEL_0".to_string(), SentimentLabel::Negative),
            ("LABEL_1".to_string(), SentimentLabel::Neutral),
            ("LABEL_2".to_string(), SentimentLabel::Positive),
        ])
    }

    /// Parse `RAW=name` pairs separated by commas, e.g.
    /// `LABEL_0=negative,LABEL_1=neutral,LABEL_2=positive`.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first malformed pair or unknown label.
    pub fn parse(pairs: &str) -> Result<Self, String> {
        let mut entries = Vec::new();
        for pair in pairs.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (raw, name) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected RAW=label, got '{pair}'"))?;
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(format!("empty raw label in '{pair}'"));
            }
            let label = SentimentLabel::from_name(name).ok_or_else(|| {
                format!("unknown sentiment '{}' (expected positive, negative, or neutral)", name.trim())
            })?;
            entries.push((raw.to_string(), label));
        }
        Ok(Self(entries))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether some mapped raw label yields `label`.
    #[must_use]
    pub fn produces(&self, label: SentimentLabel) -> bool {
        self.0.iter().any(|(_, mapped)| *mapped == label)
    }

    fn resolve(&self, raw: &str) -> Option<SentimentLabel> {
        let raw = raw.trim();
        self.0
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(raw))
            .map(|(_, label)| *label)
            .or_else(|| SentimentLabel::from_name(raw))
    }
}

/// Client for the sentiment and political-bias classifier endpoints.
#[derive(Debug, Clone)]
pub struct ClassifierClient {
    client: Client,
    api_key: String,
    sentiment_url: String,
    bias_url: String,
    sentiment_labels: SentimentLabelMap,
    retry: RetryPolicy,
}

impl ClassifierClient {
    /// # Errors
    ///
    /// Returns [`InferenceError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, InferenceError> {
        Self::with_endpoints(
            &config.hf_api_key,
            &config.sentiment_url,
            &config.bias_url,
            config.inference_timeout_secs,
            RetryPolicy::from_config(config),
        )
    }

    /// Build against explicit endpoints, e.g. a mock server in tests.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::Client`] if the HTTP client cannot be built.
    pub fn with_endpoints(
        api_key: &str,
        sentiment_url: &str,
        bias_url: &str,
        timeout_secs: u64,
        retry: RetryPolicy,
    ) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(InferenceError::Client)?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            sentiment_url: sentiment_url.to_string(),
            bias_url: bias_url.to_string(),
            sentiment_labels: SentimentLabelMap::default(),
            retry,
        })
    }

    /// Send sentiment requests to `url` instead of the configured model.
    #[must_use]
    pub fn with_sentiment_url(mut self, url: &str) -> Self {
        self.sentiment_url = url.to_string();
        self
    }

    /// Use `labels` to read the sentiment model's output.
    #[must_use]
    pub fn with_sentiment_labels(mut self, labels: SentimentLabelMap) -> Self {
        self.sentiment_labels = labels;
        self
    }

    /// Classify sentiment of the first [`MAX_CLASSIFIER_INPUT_CHARS`]
    /// characters of `text`.
    ///
    /// # Errors
    ///
    /// Returns an [`InferenceError`] on transport failure, exhausted retries,
    /// an empty or malformed response, or a label that is neither in the
    /// configured [`SentimentLabelMap`] nor positive/negative/neutral.
    pub async fn classify_sentiment(&self, text: &str) -> Result<SentimentSignal, InferenceError> {
        let top = self.top_label(&self.sentiment_url, text).await?;
        let label = self.sentiment_labels.resolve(&top.label).ok_or_else(|| {
            InferenceError::UnexpectedResponse(format!(
                "unknown sentiment label {:?}; configure a label map for this model",
                top.label
            ))
        })?;
        tracing::debug!(label = %label, raw = %top.label, probability = top.score, "sentiment classified");
        Ok(SentimentSignal {
            label,
            score: label.display_score(),
            confidence: probability_to_percent(top.score),
        })
    }

    /// Classify political bias of the first [`MAX_CLASSIFIER_INPUT_CHARS`]
    /// characters of `text`.
    ///
    /// # Errors
    ///
    /// Returns an [`InferenceError`] on transport failure, exhausted retries,
    /// or an empty or malformed response.
    pub async fn classify_bias(&self, text: &str) -> Result<BiasSignal, InferenceError> {
        let top = self.top_label(&self.bias_url, text).await?;
        let label = BiasLabel::from_classifier(&top.label);
        tracing::debug!(label = %label, probability = top.score, "bias classified");
        Ok(BiasSignal {
            label,
            score: probability_to_percent(top.score),
        })
    }

    async fn top_label(&self, endpoint: &str, text: &str) -> Result<LabelScore, InferenceError> {
        let request = ClassifierRequest {
            inputs: crate::truncate_chars(text, MAX_CLASSIFIER_INPUT_CHARS),
        };
        let body = self
            .retry
            .run(endpoint, || {
                crate::http::post_json(&self.client, endpoint, &self.api_key, &request)
            })
            .await?;
        parse_top_label(&body, endpoint)
    }
}

fn parse_top_label(body: &str, endpoint: &str) -> Result<LabelScore, InferenceError> {
    let response: ClassifierResponse =
        serde_json::from_str(body).map_err(|source| InferenceError::Deserialize {
            context: format!("classifier response from {endpoint}"),
            source,
        })?;
    response
        .into_scores()
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| {
            InferenceError::UnexpectedResponse(format!("empty label list from {endpoint}"))
        })
}
