//! Discovery of task directories under a root.

use std::fs;
use std::path::{Path, PathBuf};

use taskmark_canonical::{
    split_regions, unify_line_endings, Canonicalizer, FieldValue, Frontmatter, FrontmatterParser as _,
    HygieneReport,
};
use taskmark_core::parse_rfc3339;

use crate::error::StoreError;
use crate::taskdir::TASK_FILE;
use crate::traits::TaskCatalog;
use crate::view::{ChronologyEntry, ChronologyIndex};

/// A directory whose immediate subdirectories are tasks.
#[derive(Debug)]
pub struct TaskRoot {
    path: PathBuf,
    canonicalizer: Canonicalizer,
}

impl TaskRoot {
    /// Opens an existing root directory.
    pub fn open(path: impl Into<PathBuf>, canonicalizer: Canonicalizer) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            return Err(StoreError::MissingRoot(path));
        }
        if !path.is_dir() {
            return Err(StoreError::NotADirectory(path));
        }
        Ok(Self {
            path,
            canonicalizer,
        })
    }

    /// Root path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Builds the chronology index over all discoverable tasks.
    pub fn index(&self) -> Result<ChronologyIndex, StoreError> {
        Ok(ChronologyIndex::build(self.entries()?))
    }

    fn read_frontmatter(&self, task_file: &Path) -> Option<Frontmatter> {
        let text = match fs::read_to_string(task_file) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %task_file.display(), error = %e, "skipping unreadable task");
                return None;
            }
        };
        let text = unify_line_endings(&text, &mut HygieneReport::default());
        let parsed = split_regions(&text)
            .and_then(|regions| self.canonicalizer.parser().parse(regions.frontmatter));
        match parsed {
            Ok(frontmatter) if !frontmatter.is_empty() => Some(frontmatter),
            Ok(_) => {
                tracing::warn!(path = %task_file.display(), "skipping task with empty frontmatter");
                None
            }
            Err(e) => {
                tracing::warn!(path = %task_file.display(), error = %e, "skipping malformed task");
                None
            }
        }
    }
}

fn declared_text(frontmatter: &Frontmatter, key: &str) -> Option<String> {
    match frontmatter.get(key)? {
        FieldValue::Null => None,
        value => Some(value.to_string()).filter(|text| !text.is_empty()),
    }
}

impl TaskCatalog for TaskRoot {
    fn entries(&self) -> Result<Vec<ChronologyEntry>, StoreError> {
        let mut entries = Vec::new();
        for dirent in fs::read_dir(&self.path)? {
            let dir = dirent?.path();
            if !dir.is_dir() {
                continue;
            }
            let task_file = dir.join(TASK_FILE);
            if !task_file.is_file() {
                continue;
            }
            let Some(frontmatter) = self.read_frontmatter(&task_file) else {
                continue;
            };

            let slot = dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let created_at = declared_text(&frontmatter, "created_at").unwrap_or_default();
            entries.push(ChronologyEntry {
                id: declared_text(&frontmatter, "id").unwrap_or_else(|| slot.clone()),
                slot,
                path: dir,
                sort_key: parse_rfc3339(&created_at),
                created_at,
            });
        }
        tracing::debug!(root = %self.path.display(), tasks = entries.len(), "discovered tasks");
        Ok(entries)
    }
}
