//! Newest-first analysis history persisted as one JSON array on disk.

pub mod entry;
pub mod error;
pub mod store;

pub use entry::{HistoryEntry, HistoryResults, MAX_INPUT_CHARS};
pub use error::HistoryError;
pub use store::{HistoryStore, MAX_ENTRIES};
