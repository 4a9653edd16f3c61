//! Sentiment classifier evaluation over a labelled dataset.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use biaslens_analysis::evaluate;
use biaslens_core::{AppConfig, SentimentLabel};
use biaslens_inference::{ClassifierClient, SentimentLabelMap};
use clap::Args;
use serde::Deserialize;

pub(crate) const CARDIFF_SENTIMENT_URL: &str =
    "https://api-inference.huggingface.co/models/cardiffnlp/twitter-roberta-base-sentiment";

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// JSON array of `{"text": ..., "label": ...}` records
    pub dataset: PathBuf,

    /// Labels to report on, comma-separated [default: Positive,Negative, plus
    /// Neutral when the label map produces it]
    #[arg(long, value_delimiter = ',')]
    pub labels: Vec<String>,

    /// Sentiment model endpoint to evaluate instead of the configured one
    #[arg(long)]
    pub model_url: Option<String>,

    /// Raw model labels to sentiments, e.g. `LABEL_0=negative,LABEL_1=neutral`
    #[arg(long, value_parser = SentimentLabelMap::parse)]
    pub label_map: Option<SentimentLabelMap>,

    /// Evaluate the three-class Cardiff twitter-roberta model
    #[arg(long, conflicts_with = "label_map")]
    pub cardiff: bool,
}

impl EvaluateArgs {
    pub(crate) fn sentiment_labels(&self) -> SentimentLabelMap {
        if self.cardiff {
            SentimentLabelMap::cardiff()
        } else {
            self.label_map.clone().unwrap_or_default()
        }
    }

    pub(crate) fn model_url<'a>(&'a self, config: &'a AppConfig) -> &'a str {
        match (&self.model_url, self.cardiff) {
            (Some(url), _) => url.as_str(),
            (None, true) => CARDIFF_SENTIMENT_URL,
            (None, false) => config.sentiment_url.as_str(),
        }
    }

    pub(crate) fn report_labels(&self, map: &SentimentLabelMap) -> Vec<String> {
        if !self.labels.is_empty() {
            return self.labels.clone();
        }
        let mut labels = vec![
            SentimentLabel::Positive.to_string(),
            SentimentLabel::Negative.to_string(),
        ];
        if map.produces(SentimentLabel::Neutral) {
            labels.push(SentimentLabel::Neutral.to_string());
        }
        labels
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LabelledText {
    pub text: String,
    pub label: String,
}

pub(crate) fn parse_dataset(raw: &str) -> anyhow::Result<Vec<LabelledText>> {
    let records: Vec<LabelledText> =
        serde_json::from_str(raw).context("dataset must be a JSON array of {text, label}")?;
    Ok(records
        .into_iter()
        .filter(|r| !r.text.trim().is_empty())
        .collect())
}

/// `(expected, predicted)` pairs plus what could not be scored.
#[derive(Debug, Default)]
pub(crate) struct Scored {
    pub pairs: Vec<(String, String)>,
    pub skipped: usize,
    pub first_error: Option<String>,
}

pub(crate) async fn score_records(classifier: &ClassifierClient, records: &[LabelledText]) -> Scored {
    let mut scored = Scored {
        pairs: Vec::with_capacity(records.len()),
        ..Scored::default()
    };

    for (i, record) in records.iter().enumerate() {
        match classifier.classify_sentiment(&record.text).await {
            Ok(signal) => scored
                .pairs
                .push((record.label.clone(), signal.label.to_string())),
            Err(e) => {
                scored.skipped += 1;
                tracing::warn!(record = i, error = %e, "classification failed, skipping record");
                scored.first_error.get_or_insert_with(|| e.to_string());
            }
        }
        if (i + 1) % 25 == 0 {
            tracing::info!(done = i + 1, total = records.len(), "evaluation progress");
        }
    }
    scored
}

/// Classify every record and print per-class metrics.
///
/// Records the classifier fails on are skipped and counted.
///
/// # Errors
///
/// Returns an error if the dataset cannot be read or parsed, the classifier
/// client cannot be built, or no record could be scored.
pub(crate) async fn run_evaluate(config: &AppConfig, args: &EvaluateArgs) -> anyhow::Result<()> {
    let dataset: &Path = &args.dataset;
    let raw = tokio::fs::read_to_string(dataset)
        .await
        .with_context(|| format!("reading {}", dataset.display()))?;
    let records = parse_dataset(&raw)?;
    if records.is_empty() {
        anyhow::bail!("dataset {} has no usable records", dataset.display());
    }

    let label_map = args.sentiment_labels();
    let model_url = args.model_url(config);
    tracing::info!(model_url, records = records.len(), "evaluating sentiment classifier");
    let classifier = ClassifierClient::new(config)?
        .with_sentiment_url(model_url)
        .with_sentiment_labels(label_map.clone());

    let scored = score_records(&classifier, &records).await;
    if scored.pairs.is_empty() {
        anyhow::bail!(
            "the classifier scored none of the {} records; first error: {}",
            records.len(),
            scored.first_error.as_deref().unwrap_or("unknown"),
        );
    }

    let report = evaluate(&args.report_labels(&label_map), &scored.pairs);
    println!("{report}");
    println!(
        "scored: {} of {} record(s); skipped: {}",
        scored.pairs.len(),
        records.len(),
        scored.skipped
    );
    if let Some(first) = &scored.first_error {
        println!("first skip reason: {first}");
    }
    Ok(())
}
