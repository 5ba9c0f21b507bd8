//! Chronology view for task navigation.
//!
//! Tasks are ordered newest first by `created_at`. Missing or unparseable
//! timestamps sort as the oldest possible value; equal timestamps fall back
//! to `id`, then slot name, so the order never depends on discovery order.

use std::cmp::Ordering;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors returned by chronology navigation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// No task matches the identifier.
    #[error("Task not found: {0}")]
    NotFound(String),
    /// The root holds no navigable tasks.
    #[error("No tasks found.")]
    Empty,
}

/// One navigable task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChronologyEntry {
    /// Declared `id`, or the slot name when none is declared.
    pub id: String,
    /// Storage slot name (the task directory name).
    pub slot: String,
    /// Task directory.
    pub path: PathBuf,
    /// `created_at` exactly as written; empty when absent.
    pub created_at: String,
    /// Parsed `created_at` used for ordering.
    #[serde(skip)]
    pub sort_key: Option<DateTime<Utc>>,
}

impl ChronologyEntry {
    fn effective_time(&self) -> DateTime<Utc> {
        self.sort_key.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.effective_time()
            .cmp(&a.effective_time())
            .then_with(|| a.id.cmp(&b.id))
            .then_with(|| a.slot.cmp(&b.slot))
    }
}

/// Ordered, immutable view over a set of tasks. Rebuilt per query.
#[derive(Debug, Clone, Default)]
pub struct ChronologyIndex {
    entries: Vec<ChronologyEntry>,
}

impl ChronologyIndex {
    /// Orders `entries` newest first.
    pub fn build(mut entries: Vec<ChronologyEntry>) -> Self {
        entries.sort_by(ChronologyEntry::newest_first);
        tracing::debug!(tasks = entries.len(), "built chronology index");
        Self { entries }
    }

    /// Entries in order.
    pub fn entries(&self) -> &[ChronologyEntry] {
        &self.entries
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no tasks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest task.
    pub fn first(&self) -> Option<&ChronologyEntry> {
        self.entries.first()
    }

    /// Oldest task.
    pub fn last(&self) -> Option<&ChronologyEntry> {
        self.entries.last()
    }

    /// Position of a task, matching declared ids before slot names.
    pub fn position(&self, id: &str) -> Result<usize, NavigationError> {
        self.entries
            .iter()
            .position(|entry| entry.id == id)
            .or_else(|| self.entries.iter().position(|entry| entry.slot == id))
            .ok_or_else(|| NavigationError::NotFound(id.to_string()))
    }

    /// The task after `id` (next older one); `None` at the end.
    pub fn next(&self, id: &str) -> Result<Option<&ChronologyEntry>, NavigationError> {
        let index = self.position(id)?;
        Ok(self.entries.get(index + 1))
    }

    /// The task before `id` (next newer one); `None` at the start.
    pub fn previous(&self, id: &str) -> Result<Option<&ChronologyEntry>, NavigationError> {
        let index = self.position(id)?;
        Ok(index.checked_sub(1).and_then(|i| self.entries.get(i)))
    }
}
