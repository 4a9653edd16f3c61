use biaslens_core::{BiasLabel, CredibilityLevel, SentimentLabel};
use serde::{Deserialize, Serialize};

/// Everything learned about one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalResult {
    pub source_url: String,
    pub sentiment_label: SentimentLabel,
    /// Display score: Positive 100, Negative 0, Neutral 50, Error 0.
    pub sentiment_score: u8,
    /// The classifier's own probability for its top label, as a percentage.
    pub sentiment_confidence: u8,
    pub bias_label: BiasLabel,
    pub bias_score: u8,
    pub summary: String,
    pub key_findings: Vec<String>,
    pub bias_indicators: Vec<String>,
    pub credibility_assessment: String,
    pub credibility_level: CredibilityLevel,
    pub recommended_searches: Vec<String>,
    /// Classifier failures for this article.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Generative model failure for this article.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_error: Option<String>,
}

impl SignalResult {
    /// Usable for statistics: neither classifier label is an error.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.sentiment_label.is_error() && !self.bias_label.is_error()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    #[serde(rename = "Positive")]
    pub positive: u8,
    #[serde(rename = "Negative")]
    pub negative: u8,
    #[serde(rename = "Neutral")]
    pub neutral: u8,
}

impl SentimentDistribution {
    /// `score` under `label`, zero elsewhere. `Error` sets nothing.
    #[must_use]
    pub fn seeded(label: SentimentLabel, score: u8) -> Self {
        let mut dist = Self::default();
        if let Some(slot) = dist.slot_mut(label) {
            *slot = score;
        }
        dist
    }

    pub(crate) fn slot_mut(&mut self, label: SentimentLabel) -> Option<&mut u8> {
        match label {
            SentimentLabel::Positive => Some(&mut self.positive),
            SentimentLabel::Negative => Some(&mut self.negative),
            SentimentLabel::Neutral => Some(&mut self.neutral),
            SentimentLabel::Error => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasDistribution {
    #[serde(rename = "Left")]
    pub left: u8,
    #[serde(rename = "Center")]
    pub center: u8,
    #[serde(rename = "Right")]
    pub right: u8,
}

impl BiasDistribution {
    /// `score` under `label`, zero elsewhere. `Error` and unrecognized labels
    /// set nothing.
    #[must_use]
    pub fn seeded(label: &BiasLabel, score: u8) -> Self {
        let mut dist = Self::default();
        if let Some(slot) = dist.slot_mut(label) {
            *slot = score;
        }
        dist
    }

    pub(crate) fn slot_mut(&mut self, label: &BiasLabel) -> Option<&mut u8> {
        match label {
            BiasLabel::Left => Some(&mut self.left),
            BiasLabel::Center => Some(&mut self.center),
            BiasLabel::Right => Some(&mut self.right),
            BiasLabel::Error | BiasLabel::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizationData {
    pub sentiment_distribution: SentimentDistribution,
    pub bias_distribution: BiasDistribution,
}

/// Condensed per-article outcome attached to multi-article results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDetail {
    pub source_url: String,
    pub sentiment: SentimentLabel,
    pub bias: BiasLabel,
    pub credibility_level: CredibilityLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&SignalResult> for ArticleDetail {
    fn from(result: &SignalResult) -> Self {
        let error = match (&result.error, &result.llm_error) {
            (Some(e), Some(l)) => Some(format!("{e}; {l}")),
            (Some(e), None) => Some(e.clone()),
            (None, Some(l)) => Some(l.clone()),
            (None, None) => None,
        };
        Self {
            source_url: result.source_url.clone(),
            sentiment: result.sentiment_label,
            bias: result.bias_label.clone(),
            credibility_level: result.credibility_level,
            error,
        }
    }
}

/// The `analysis` block of a response: merged fields across articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedAnalysis {
    pub sentiment: SentimentLabel,
    pub sentiment_score: u8,
    pub political_bias: BiasLabel,
    pub political_bias_score: u8,
    pub summary: String,
    pub key_findings: Vec<String>,
    pub bias_indicators: Vec<String>,
    pub credibility_assessment: String,
    pub credibility_level: CredibilityLevel,
    pub recommended_searches: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub articles: Vec<ArticleDetail>,
}

impl MergedAnalysis {
    /// A single article's fields, unchanged.
    #[must_use]
    pub fn from_single(result: &SignalResult) -> Self {
        Self {
            sentiment: result.sentiment_label,
            sentiment_score: result.sentiment_score,
            political_bias: result.bias_label.clone(),
            political_bias_score: result.bias_score,
            summary: result.summary.clone(),
            key_findings: result.key_findings.clone(),
            bias_indicators: result.bias_indicators.clone(),
            credibility_assessment: result.credibility_assessment.clone(),
            credibility_level: result.credibility_level,
            recommended_searches: result.recommended_searches.clone(),
            error: result.error.clone(),
            llm_error: result.llm_error.clone(),
            articles: Vec::new(),
        }
    }
}

/// The response for one analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub source_display: String,
    pub sentiment: SentimentLabel,
    pub bias: BiasLabel,
    pub sentiment_value: u8,
    pub bias_value: u8,
    pub summary: String,
    pub credibility_level: CredibilityLevel,
    pub credibility_value: u8,
    pub article_count: usize,
    /// Every article had classifier errors; values come from the first one.
    pub degraded: bool,
    pub analysis: MergedAnalysis,
    pub visualization_data: VisualizationData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distributions_serialize_with_display_keys() {
        let viz = VisualizationData {
            sentiment_distribution: SentimentDistribution::seeded(SentimentLabel::Positive, 100),
            bias_distribution: BiasDistribution::seeded(&BiasLabel::Right, 72),
        };
        let json = serde_json::to_value(viz).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sentiment_distribution": { "Positive": 100, "Negative": 0, "Neutral": 0 },
                "bias_distribution": { "Left": 0, "Center": 0, "Right": 72 }
            })
        );
    }

    #[test]
    fn error_labels_seed_nothing() {
        assert_eq!(
            SentimentDistribution::seeded(SentimentLabel::Error, 40),
            SentimentDistribution::default()
        );
        assert_eq!(
            BiasDistribution::seeded(&BiasLabel::Other("Libertarian".into()), 40),
            BiasDistribution::default()
        );
    }
}
