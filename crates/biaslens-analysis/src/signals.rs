use biaslens_core::{ArticleText, BiasLabel, SentimentLabel};
use biaslens_inference::{ClassifierClient, GenerativeClient, GenerativeReport};

use crate::credibility::map_credibility;
use crate::types::SignalResult;

/// Run sentiment, bias, and generative analysis on one article, in that
/// order.
///
/// Never fails: a classifier error becomes an `Error` label with score 0 and
/// a note in `error`; a generative error becomes `"N/A"` / empty lists with a
/// note in `llm_error`.
pub async fn collect_signals(
    classifier: &ClassifierClient,
    generative: &GenerativeClient,
    article: &ArticleText,
) -> SignalResult {
    let mut errors = Vec::new();

    let (sentiment_label, sentiment_score, sentiment_confidence) =
        match classifier.classify_sentiment(&article.text).await {
            Ok(signal) => (signal.label, signal.score, signal.confidence),
            Err(e) => {
                tracing::warn!(source_url = %article.source_url, error = %e, "sentiment analysis failed");
                errors.push(format!("sentiment: {e}"));
                (SentimentLabel::Error, 0, 0)
            }
        };

    let (bias_label, bias_score) = match classifier.classify_bias(&article.text).await {
        Ok(signal) => (signal.label, signal.score),
        Err(e) => {
            tracing::warn!(source_url = %article.source_url, error = %e, "bias analysis failed");
            errors.push(format!("bias: {e}"));
            (BiasLabel::Error, 0)
        }
    };

    let (report, llm_error) = match generative.generate_report(&article.text).await {
        Ok(report) => (report, None),
        Err(e) => {
            tracing::warn!(source_url = %article.source_url, error = %e, "generative analysis failed");
            (GenerativeReport::unavailable(), Some(e.to_string()))
        }
    };

    SignalResult {
        source_url: article.source_url.clone(),
        sentiment_label,
        sentiment_score,
        sentiment_confidence,
        bias_label,
        bias_score,
        credibility_level: map_credibility(&report.credibility_assessment),
        summary: report.summary,
        key_findings: report.key_findings,
        bias_indicators: report.bias_indicators,
        credibility_assessment: report.credibility_assessment,
        recommended_searches: report.recommended_searches,
        error: (!errors.is_empty()).then(|| errors.join("; ")),
        llm_error,
    }
}
