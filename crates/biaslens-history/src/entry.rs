use biaslens_analysis::AggregatedResult;
use biaslens_core::labels::capitalize;
use biaslens_core::InputType;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Longer input values are cut to this many characters plus `"..."`.
pub const MAX_INPUT_CHARS: usize = 100;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Condensed record of one successful analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub date: String,
    pub input_type: InputType,
    pub input_value: String,
    pub results: HistoryResults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryResults {
    pub bias: String,
    pub sentiment: String,
    pub bias_value: u8,
    pub sentiment_value: u8,
}

impl HistoryEntry {
    /// Build an entry stamped with the current local time.
    ///
    /// The id is the creation time in milliseconds; the store may bump it to
    /// keep ids strictly increasing.
    #[must_use]
    pub fn from_result(input_type: InputType, input_value: &str, result: &AggregatedResult) -> Self {
        Self::from_result_at(Local::now(), input_type, input_value, result)
    }

    #[must_use]
    pub fn from_result_at(
        now: DateTime<Local>,
        input_type: InputType,
        input_value: &str,
        result: &AggregatedResult,
    ) -> Self {
        Self {
            id: now.timestamp_millis(),
            date: now.format(DATE_FORMAT).to_string(),
            input_type,
            input_value: truncate_input(input_value),
            results: HistoryResults {
                bias: capitalize(result.bias.as_str()),
                sentiment: capitalize(result.sentiment.as_str()),
                bias_value: result.bias_value,
                sentiment_value: result.sentiment_value,
            },
        }
    }
}

fn truncate_input(value: &str) -> String {
    match value.char_indices().nth(MAX_INPUT_CHARS) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}
