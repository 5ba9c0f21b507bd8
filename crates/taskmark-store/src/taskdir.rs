//! Directory-per-task storage backend.

use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use taskmark_canonical::Canonicalizer;
use taskmark_core::{DerivedStatus, StatusEngine, TaskDocument, TaskSource};

use crate::error::StoreError;
use crate::report::render_state_report;
use crate::traits::ReportWriter;

/// Task document file inside a task directory.
pub const TASK_FILE: &str = "00_TASK.md";

/// Derived-state report written next to the task document.
pub const STATE_FILE: &str = "99_STATE.md";

/// A directory holding one task document and its derived-state report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDir {
    path: PathBuf,
}

impl TaskDir {
    /// Opens a task directory, requiring it to contain [`TASK_FILE`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.is_dir() {
            return Err(StoreError::NotADirectory(path));
        }
        if !path.join(TASK_FILE).is_file() {
            return Err(StoreError::MissingTaskFile(path));
        }
        Ok(Self { path })
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name.
    pub fn slot(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Path of the task document.
    pub fn task_file(&self) -> PathBuf {
        self.path.join(TASK_FILE)
    }

    /// Path of the derived-state report.
    pub fn report_file(&self) -> PathBuf {
        self.path.join(STATE_FILE)
    }

    /// Reads and parses the task document.
    pub fn read_document(&self, canonicalizer: &Canonicalizer) -> Result<TaskDocument, StoreError> {
        let text = self.read_text()?;
        Ok(TaskDocument::parse(text, canonicalizer)?)
    }

    /// Evaluates the task's derived status at `now`.
    pub fn evaluate(&self, engine: &StatusEngine, now: DateTime<Utc>) -> Result<DerivedStatus, StoreError> {
        Ok(engine.evaluate_source(self, now)?)
    }
}

impl TaskSource for TaskDir {
    fn locator(&self) -> String {
        self.task_file().display().to_string()
    }

    fn read_text(&self) -> io::Result<String> {
        fs::read_to_string(self.task_file())
    }
}

impl ReportWriter for TaskDir {
    /// Writes `99_STATE.md` atomically: a temp file in the same directory is
    /// synced and then renamed over the target.
    fn write_report(&self, status: &DerivedStatus) -> Result<PathBuf, StoreError> {
        let target = self.report_file();
        let persist_failed = |source: io::Error| StoreError::Persist {
            path: target.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.path).map_err(persist_failed)?;
        tmp.write_all(render_state_report(status).as_bytes())
            .map_err(persist_failed)?;
        tmp.as_file().sync_all().map_err(persist_failed)?;
        tmp.persist(&target).map_err(|e| persist_failed(e.error))?;

        tracing::debug!(path = %target.display(), task_id = %status.task_id, "wrote state report");
        Ok(target)
    }
}
