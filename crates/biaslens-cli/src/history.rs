use std::path::Path;

use biaslens_history::{HistoryEntry, HistoryStore};
use clap::Subcommand;

/// Sub-commands available under `history`.
#[derive(Debug, Subcommand)]
pub enum HistoryCommands {
    /// List recorded analyses, newest first
    List,
    /// Delete one entry by id
    Delete { id: i64 },
    /// Remove every entry
    Clear,
}

/// Run a history command against the store at `path`. Needs no API keys.
///
/// # Errors
///
/// Returns an error if the file cannot be written or a deleted id is unknown.
pub(crate) async fn run_history(path: &Path, command: HistoryCommands) -> anyhow::Result<()> {
    let store = HistoryStore::new(path);
    match command {
        HistoryCommands::List => {
            let entries = store.load().await;
            if entries.is_empty() {
                println!("no analyses recorded");
            } else {
                for entry in &entries {
                    println!("{}", format_entry(entry));
                }
            }
        }
        HistoryCommands::Delete { id } => {
            if store.delete_by_id(id).await? {
                println!("deleted history entry {id}");
            } else {
                anyhow::bail!("history entry {id} not found");
            }
        }
        HistoryCommands::Clear => {
            store.clear().await?;
            println!("history cleared");
        }
    }
    Ok(())
}

pub(crate) fn format_entry(entry: &HistoryEntry) -> String {
    format!(
        "{id}  {date}  {kind:<5}  {sentiment} ({sv}) / {bias} ({bv})  {value}",
        id = entry.id,
        date = entry.date,
        kind = entry.input_type.as_str(),
        sentiment = entry.results.sentiment,
        sv = entry.results.sentiment_value,
        bias = entry.results.bias,
        bv = entry.results.bias_value,
        value = entry.input_value,
    )
}
