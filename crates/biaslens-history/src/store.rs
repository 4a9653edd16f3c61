//! JSON-file history store.
//!
//! The whole history is one JSON array, rewritten on every change. Loading is
//! forgiving: a missing file is created empty, and unreadable or malformed
//! content is treated as an empty history with a warning. Every
//! read-modify-write goes through one async mutex, so a single process never
//! loses its own updates.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::sync::Mutex;

use crate::entry::HistoryEntry;
use crate::error::HistoryError;

/// Entries beyond this count are evicted oldest-first.
pub const MAX_ENTRIES: usize = 20;

#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl HistoryStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current entries, newest first. Never fails.
    pub async fn load(&self) -> Vec<HistoryEntry> {
        let _guard = self.lock.lock().await;
        self.read_entries().await
    }

    /// Replace the stored history with `entries`.
    ///
    /// # Errors
    ///
    /// Returns a [`HistoryError`] if the file cannot be written.
    pub async fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let _guard = self.lock.lock().await;
        self.write_entries(entries).await
    }

    /// Insert `entry` at the head, evicting beyond [`MAX_ENTRIES`]. Returns the
    /// entry as stored, with its id bumped if needed to stay above the
    /// current newest id.
    ///
    /// # Errors
    ///
    /// Returns a [`HistoryError`] if the file cannot be written.
    pub async fn append(&self, mut entry: HistoryEntry) -> Result<HistoryEntry, HistoryError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await;
        if let Some(head) = entries.first() {
            if entry.id <= head.id {
                entry.id = head.id + 1;
            }
        }
        entries.insert(0, entry.clone());
        entries.truncate(MAX_ENTRIES);
        self.write_entries(&entries).await?;
        tracing::debug!(id = entry.id, total = entries.len(), "history entry appended");
        Ok(entry)
    }

    /// Remove the entry with `id`. Returns `false`, without writing, when no
    /// entry matched.
    ///
    /// # Errors
    ///
    /// Returns a [`HistoryError`] if the file cannot be written.
    pub async fn delete_by_id(&self, id: i64) -> Result<bool, HistoryError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.write_entries(&entries).await?;
        tracing::info!(id, "history entry deleted");
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns a [`HistoryError`] if the file cannot be written.
    pub async fn clear(&self) -> Result<(), HistoryError> {
        let _guard = self.lock.lock().await;
        self.write_entries(&[]).await?;
        tracing::info!(path = %self.path.display(), "history cleared");
        Ok(())
    }

    async fn read_entries(&self) -> Vec<HistoryEntry> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Err(e) = self.write_entries(&[]).await {
                    tracing::warn!(error = %e, "could not create empty history file");
                }
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "could not read history file");
                return Vec::new();
            }
        };

        if raw.trim().is_empty() {
            return Vec::new();
        }

        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                tracing::warn!(path = %self.path.display(), "history file is not a JSON array, resetting");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "history file is not valid JSON, resetting");
                return Vec::new();
            }
        };

        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<HistoryEntry>(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed history entry");
                    None
                }
            })
            .collect()
    }

    /// Write via a sibling temp file and rename, so a crash never leaves a
    /// half-written history.
    async fn write_entries(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let io_err = |source| HistoryError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }
}
