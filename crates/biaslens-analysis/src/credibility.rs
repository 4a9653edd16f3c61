//! Keyword mapping from a free-text credibility assessment to a level.
//!
//! Matching is on whole words after lowercasing and turning punctuation into
//! spaces, so "well-sourced" and "well sourced" are the same phrase and
//! "unbiased" does not hit "biased". A keyword directly preceded by "not" or
//! "no" does not count, so "not reliable" is Low and "not biased" is not.
//! Low wins over High, High over Medium; anything else is Medium.

use biaslens_core::CredibilityLevel;

const LOW_KEYWORDS: &[&str] = &[
    "lacks sourcing",
    "unverified",
    "misleading",
    "biased",
    "emotionally charged",
    "sensational",
    "questionable",
    "not credible",
    "unreliable",
    "propaganda",
    "lacks evidence",
    "one sided",
    "low credibility",
    "lacks credibility",
    "not reliable",
    "not balanced",
    "not factual",
    "not well sourced",
    "not trustworthy",
    "no sources",
];

const HIGH_KEYWORDS: &[&str] = &[
    "highly credible",
    "appears credible",
    "well sourced",
    "credible",
    "reliable",
    "multiple viewpoints",
    "balanced",
    "factual",
    "cites sources",
    "reputable",
];

const NEGATIONS: &[&str] = &["not", "no"];

const MEDIUM_KEYWORDS: &[&str] = &[
    "somewhat",
    "partially",
    "mixed",
    "moderate",
    "some sourcing",
    "limited sourcing",
];

#[must_use]
pub fn map_credibility(assessment: &str) -> CredibilityLevel {
    let normalized = normalize(assessment);
    if normalized.trim().is_empty() || normalized.trim() == "n a" {
        return CredibilityLevel::Medium;
    }

    let matches_any = |keywords: &[&str]| keywords.iter().any(|kw| mentions(&normalized, kw));

    if matches_any(LOW_KEYWORDS) {
        CredibilityLevel::Low
    } else if matches_any(HIGH_KEYWORDS) {
        CredibilityLevel::High
    } else {
        if !matches_any(MEDIUM_KEYWORDS) {
            tracing::debug!(assessment, "no credibility keyword matched");
        }
        CredibilityLevel::Medium
    }
}

/// `keyword` occurs as whole words in `normalized` at least once without a
/// negation word right before it.
fn mentions(normalized: &str, keyword: &str) -> bool {
    let needle = format!(" {keyword} ");
    normalized
        .match_indices(&needle)
        .any(|(at, _)| !ends_with_negation(&normalized[..at]))
}

fn ends_with_negation(before: &str) -> bool {
    before
        .rsplit(' ')
        .next()
        .is_some_and(|word| NEGATIONS.contains(&word))
}

/// Lowercase, map non-alphanumerics to spaces, collapse runs, pad both ends.
fn normalize(text: &str) -> String {
    let spaced: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();
    let words: Vec<&str> = spaced.split_whitespace().collect();
    format!(" {} ", words.join(" "))
}
