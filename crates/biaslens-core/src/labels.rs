//! Normalized labels shared by the classifiers, the aggregator, and history.

use serde::{Deserialize, Serialize};

/// Sentiment outcome for one article.
///
/// The reference classifier is binary, so `Neutral` only appears when a
/// three-class model is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Error,
}

impl SentimentLabel {
    /// Labels that always appear in a sentiment distribution, in display order.
    pub const DISTRIBUTION_KEYS: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    /// Parse a classifier or user-supplied label name (`positive`,
    /// `NEGATIVE`, ...). `Error` is never parsed.
    #[must_use]
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Some(SentimentLabel::Positive),
            "NEGATIVE" => Some(SentimentLabel::Negative),
            "NEUTRAL" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }

    /// Fixed 0-100 display value: Positive 100, Neutral 50, Negative and
    /// Error 0.
    #[must_use]
    pub fn display_score(self) -> u8 {
        match self {
            SentimentLabel::Positive => 100,
            SentimentLabel::Neutral => 50,
            SentimentLabel::Negative | SentimentLabel::Error => 0,
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        self == SentimentLabel::Error
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Error => "Error",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Political-bias outcome for one article.
///
/// Classifier labels outside `LEFT|CENTER|RIGHT` are kept verbatim (capitalized)
/// in [`BiasLabel::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum BiasLabel {
    Left,
    Center,
    Right,
    Error,
    Other(String),
}

impl BiasLabel {
    /// Labels that always appear in a bias distribution, in display order.
    pub const DISTRIBUTION_KEYS: [BiasLabel; 3] =
        [BiasLabel::Left, BiasLabel::Center, BiasLabel::Right];

    /// Map a raw classifier label onto the normalized set.
    #[must_use]
    pub fn from_classifier(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LEFT" => BiasLabel::Left,
            "CENTER" => BiasLabel::Center,
            "RIGHT" => BiasLabel::Right,
            _ => BiasLabel::Other(capitalize(raw.trim())),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        *self == BiasLabel::Error
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            BiasLabel::Left => "Left",
            BiasLabel::Center => "Center",
            BiasLabel::Right => "Right",
            BiasLabel::Error => "Error",
            BiasLabel::Other(label) => label,
        }
    }
}

impl std::fmt::Display for BiasLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<BiasLabel> for String {
    fn from(label: BiasLabel) -> Self {
        match label {
            BiasLabel::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl From<String> for BiasLabel {
    fn from(raw: String) -> Self {
        if raw.eq_ignore_ascii_case("error") {
            BiasLabel::Error
        } else {
            BiasLabel::from_classifier(&raw)
        }
    }
}

/// Coarse credibility bucket derived from the generative model's assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredibilityLevel {
    Low,
    Medium,
    High,
}

impl CredibilityLevel {
    /// Fixed 0-100 value used for the credibility gauge.
    #[must_use]
    pub fn score(self) -> u8 {
        match self {
            CredibilityLevel::Low => 25,
            CredibilityLevel::Medium => 50,
            CredibilityLevel::High => 85,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CredibilityLevel::Low => "Low",
            CredibilityLevel::Medium => "Medium",
            CredibilityLevel::High => "High",
        }
    }
}

impl std::fmt::Display for CredibilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uppercase the first character and lowercase the rest.
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
