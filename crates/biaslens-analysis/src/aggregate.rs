//! Folding per-article results into one response.
//!
//! One article passes through unchanged. For several articles, labels and
//! scores are computed over the *valid* ones only (no classifier errors),
//! while the free-text fields are collected from every article. If no article
//! is valid, the first article's result is returned as-is and flagged
//! `degraded`.

use biaslens_core::{BiasLabel, SentimentLabel};

use crate::types::{
    AggregatedResult, ArticleDetail, BiasDistribution, MergedAnalysis, SentimentDistribution,
    SignalResult, VisualizationData,
};

const SUMMARY_SEPARATOR: &str = "\n\n---\n\n";
const MAX_FINDINGS: usize = 10;
const MAX_INDICATORS: usize = 10;
const MAX_SEARCHES: usize = 5;

/// Share of valid articles labelled Positive at or above which the overall
/// sentiment is Positive.
const POSITIVE_THRESHOLD: f64 = 0.5;

/// Combine per-article results. Returns `None` for an empty slice.
#[must_use]
pub fn aggregate(source_display: &str, results: &[SignalResult]) -> Option<AggregatedResult> {
    let first = results.first()?;
    if results.len() == 1 {
        return Some(pass_through(source_display, first, 1, false));
    }

    let valid: Vec<&SignalResult> = results.iter().filter(|r| r.is_valid()).collect();
    if valid.is_empty() {
        tracing::warn!(
            articles = results.len(),
            "all articles had classifier errors, falling back to first result"
        );
        let mut degraded = pass_through(source_display, first, results.len(), true);
        degraded.analysis.articles = results.iter().map(ArticleDetail::from).collect();
        return Some(degraded);
    }

    Some(merge(source_display, results, &valid))
}

fn pass_through(
    source_display: &str,
    result: &SignalResult,
    article_count: usize,
    degraded: bool,
) -> AggregatedResult {
    AggregatedResult {
        source_display: source_display.to_string(),
        sentiment: result.sentiment_label,
        bias: result.bias_label.clone(),
        sentiment_value: result.sentiment_score.min(100),
        bias_value: result.bias_score.min(100),
        summary: result.summary.clone(),
        credibility_level: result.credibility_level,
        credibility_value: result.credibility_level.score(),
        article_count,
        degraded,
        analysis: MergedAnalysis::from_single(result),
        visualization_data: VisualizationData {
            sentiment_distribution: SentimentDistribution::seeded(
                result.sentiment_label,
                result.sentiment_score.min(100),
            ),
            bias_distribution: BiasDistribution::seeded(
                &result.bias_label,
                result.bias_score.min(100),
            ),
        },
    }
}

fn merge(source_display: &str, all: &[SignalResult], valid: &[&SignalResult]) -> AggregatedResult {
    let positive = valid
        .iter()
        .filter(|r| r.sentiment_label == SentimentLabel::Positive)
        .count();
    #[allow(clippy::cast_precision_loss)]
    let positive_share = positive as f64 / valid.len() as f64;
    let sentiment = if positive_share >= POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else {
        SentimentLabel::Negative
    };
    let sentiment_value = truncated_mean(valid.iter().map(|r| r.sentiment_score));

    let bias = mode_first(valid.iter().map(|r| r.bias_label.clone())).unwrap_or(BiasLabel::Error);
    let bias_value = truncated_mean(valid.iter().map(|r| r.bias_score));

    let summary = all
        .iter()
        .enumerate()
        .map(|(i, r)| format!("Article {} ({}):\n{}", i + 1, r.source_url, r.summary))
        .collect::<Vec<_>>()
        .join(SUMMARY_SEPARATOR);

    let key_findings: Vec<String> = all
        .iter()
        .flat_map(|r| {
            r.key_findings
                .iter()
                .map(move |f| format!("[{}/{}] {f}", r.bias_label, r.sentiment_label))
        })
        .take(MAX_FINDINGS)
        .collect();

    let bias_indicators: Vec<String> = all
        .iter()
        .flat_map(|r| {
            r.bias_indicators
                .iter()
                .map(move |ind| format!("[{}] {ind}", r.bias_label))
        })
        .take(MAX_INDICATORS)
        .collect();

    let mut recommended_searches: Vec<String> = Vec::new();
    for search in all.iter().flat_map(|r| r.recommended_searches.iter()) {
        if recommended_searches.len() >= MAX_SEARCHES {
            break;
        }
        if !recommended_searches.contains(search) {
            recommended_searches.push(search.clone());
        }
    }

    let credibility_level = mode_first(all.iter().map(|r| r.credibility_level))
        .unwrap_or(all[0].credibility_level);
    let credibility_assessment = all[0].credibility_assessment.clone();

    tracing::debug!(
        articles = all.len(),
        valid = valid.len(),
        sentiment = %sentiment,
        bias = %bias,
        "aggregated multi-article result"
    );

    AggregatedResult {
        source_display: source_display.to_string(),
        sentiment,
        bias: bias.clone(),
        sentiment_value,
        bias_value,
        summary: summary.clone(),
        credibility_level,
        credibility_value: credibility_level.score(),
        article_count: all.len(),
        degraded: false,
        analysis: MergedAnalysis {
            sentiment,
            sentiment_score: sentiment_value,
            political_bias: bias,
            political_bias_score: bias_value,
            summary,
            key_findings,
            bias_indicators,
            credibility_assessment,
            credibility_level,
            recommended_searches,
            error: None,
            llm_error: None,
            articles: all.iter().map(ArticleDetail::from).collect(),
        },
        visualization_data: VisualizationData {
            sentiment_distribution: sentiment_shares(valid),
            bias_distribution: bias_means(valid),
        },
    }
}

/// Percentage of valid articles carrying each sentiment label.
fn sentiment_shares(valid: &[&SignalResult]) -> SentimentDistribution {
    let mut dist = SentimentDistribution::default();
    for label in SentimentLabel::DISTRIBUTION_KEYS {
        let count = valid.iter().filter(|r| r.sentiment_label == label).count();
        let pct = count * 100 / valid.len();
        if let Some(slot) = dist.slot_mut(label) {
            *slot = u8::try_from(pct).unwrap_or(100);
        }
    }
    dist
}

/// Mean bias score per label among valid articles with that label.
fn bias_means(valid: &[&SignalResult]) -> BiasDistribution {
    let mut dist = BiasDistribution::default();
    for label in BiasLabel::DISTRIBUTION_KEYS {
        let mean = truncated_mean(
            valid
                .iter()
                .filter(|r| r.bias_label == label)
                .map(|r| r.bias_score),
        );
        if let Some(slot) = dist.slot_mut(&label) {
            *slot = mean;
        }
    }
    dist
}

/// Integer mean, rounded toward zero, clamped to 0..=100. Zero for no values.
fn truncated_mean(scores: impl Iterator<Item = u8>) -> u8 {
    let (sum, count) = scores.fold((0u64, 0u64), |(sum, count), s| {
        (sum + u64::from(s), count + 1)
    });
    if count == 0 {
        return 0;
    }
    u8::try_from((sum / count).min(100)).unwrap_or(100)
}

/// Most frequent item; ties go to the one seen first.
fn mode_first<T: PartialEq>(items: impl Iterator<Item = T>) -> Option<T> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(seen, _)| *seen == item) {
            Some((_, n)) => *n += 1,
            None => counts.push((item, 1)),
        }
    }
    let mut best: Option<(T, usize)> = None;
    for (item, n) in counts {
        if best.as_ref().map_or(true, |(_, best_n)| n > *best_n) {
            best = Some((item, n));
        }
    }
    best.map(|(item, _)| item)
}
