use biaslens_core::{BiasLabel, SentimentLabel};
use serde::{Deserialize, Serialize};

/// Normalized sentiment classifier output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentSignal {
    pub label: SentimentLabel,
    /// Display score: Positive 100, Negative 0, Neutral 50.
    pub score: u8,
    /// Classifier probability for the top label, as a percentage.
    pub confidence: u8,
}

/// Normalized political-bias classifier output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasSignal {
    pub label: BiasLabel,
    /// Classifier probability for the top label, as a percentage.
    pub score: u8,
}

/// Structured fields produced by the generative model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerativeReport {
    pub summary: String,
    pub key_findings: Vec<String>,
    pub bias_indicators: Vec<String>,
    pub credibility_assessment: String,
    pub recommended_searches: Vec<String>,
}

impl GenerativeReport {
    /// Placeholder used when the generative call fails.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            summary: "N/A".to_string(),
            key_findings: Vec::new(),
            bias_indicators: Vec::new(),
            credibility_assessment: "N/A".to_string(),
            recommended_searches: Vec::new(),
        }
    }
}

/// Convert a 0..=1 probability into a clamped whole percentage.
#[must_use]
pub fn probability_to_percent(p: f64) -> u8 {
    let pct = (p * 100.0).round().clamp(0.0, 100.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = pct as u8;
    pct
}
