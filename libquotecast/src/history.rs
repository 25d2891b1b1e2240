//! Persisted rotation log of recently used quotes
//!
//! The history is a selection-cooldown log: a quote is recorded when it is
//! selected, not when it is successfully posted.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};

/// Number of recent quotes kept in the history
pub const HISTORY_LIMIT: usize = 50;

/// Ordered list of previously selected quotes, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageHistory {
    used_quotes: Vec<String>,
}

impl UsageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history, keeping only the most recent `HISTORY_LIMIT` entries
    pub fn from_entries(entries: Vec<String>) -> Self {
        let mut history = Self {
            used_quotes: entries,
        };
        history.truncate_to(HISTORY_LIMIT);
        history
    }

    pub fn entries(&self) -> &[String] {
        &self.used_quotes
    }

    pub fn len(&self) -> usize {
        self.used_quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used_quotes.is_empty()
    }

    pub fn contains(&self, quote: &str) -> bool {
        self.used_quotes.iter().any(|q| q == quote)
    }

    /// Most recently recorded quote
    pub fn last(&self) -> Option<&str> {
        self.used_quotes.last().map(String::as_str)
    }

    /// Append a quote and drop the oldest entries beyond `HISTORY_LIMIT`
    pub fn record(&mut self, quote: impl Into<String>) {
        self.used_quotes.push(quote.into());
        self.truncate_to(HISTORY_LIMIT);
    }

    /// Keep only the last `n` entries
    pub fn truncate_to(&mut self, n: usize) {
        let len = self.used_quotes.len();
        if len > n {
            self.used_quotes.drain(..len - n);
        }
    }
}

/// Where the usage history lives between runs
pub trait HistoryStore: Send + Sync {
    /// Load the history; a missing or unreadable store yields an empty history
    fn load(&self) -> UsageHistory;

    fn save(&self, history: &UsageHistory) -> Result<()>;
}

/// JSON file store: `{"used_quotes": [...]}`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> UsageHistory {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No usage history at {}, starting fresh", self.path.display());
                return UsageHistory::new();
            }
            Err(e) => {
                warn!(
                    "Could not read usage history {}: {}. Starting fresh",
                    self.path.display(),
                    e
                );
                return UsageHistory::new();
            }
        };

        match serde_json::from_str::<UsageHistory>(&content) {
            Ok(history) => UsageHistory::from_entries(history.used_quotes),
            Err(e) => {
                warn!(
                    "Usage history {} is malformed ({}). Starting fresh",
                    self.path.display(),
                    e
                );
                UsageHistory::new()
            }
        }
    }

    /// Write via a sibling temp file that is then persisted over the target,
    /// so a crash never leaves a half-written history behind
    fn save(&self, history: &UsageHistory) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;

        let json = serde_json::to_string_pretty(history).map_err(|source| StoreError::Encode {
            path: self.path.display().to_string(),
            source,
        })?;

        let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| self.io_error(e))?;
        temp_file
            .write_all(json.as_bytes())
            .and_then(|_| temp_file.flush())
            .map_err(|e| self.io_error(e))?;
        temp_file
            .persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;

        debug!(
            history_len = history.len(),
            "Saved usage history to {}",
            self.path.display()
        );
        Ok(())
    }
}

/// In-memory store for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    history: Arc<Mutex<UsageHistory>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(entries: &[&str]) -> Self {
        let store = Self::new();
        *store.history.lock().unwrap() =
            UsageHistory::from_entries(entries.iter().map(|s| s.to_string()).collect());
        store
    }

    pub fn snapshot(&self) -> UsageHistory {
        self.history.lock().unwrap().clone()
    }

    /// Number of times `save` has been called
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> UsageHistory {
        self.snapshot()
    }

    fn save(&self, history: &UsageHistory) -> Result<()> {
        *self.history.lock().unwrap() = history.clone();
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}
