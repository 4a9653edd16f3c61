//! Clients for the remote models BiasLens depends on: a sentiment classifier,
//! a political-bias classifier, and an OpenAI-compatible generative model.

pub mod classifier;
pub mod error;
pub mod generative;
mod http;
pub mod retry;
pub mod types;

pub use classifier::{ClassifierClient, SentimentLabelMap};
pub use error::{GenerationError, InferenceError};
pub use generative::{parse_report, GenerativeClient};
pub use retry::RetryPolicy;
pub use types::{BiasSignal, GenerativeReport, SentimentSignal};

/// Keep at most `max_chars` characters of `text`.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
