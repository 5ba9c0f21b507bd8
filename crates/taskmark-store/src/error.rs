//! Error types for store operations.

use std::path::PathBuf;

use taskmark_canonical::CanonicalizationError;
use taskmark_core::CoreError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The task root does not exist.
    #[error("root directory does not exist: {}", .0.display())]
    MissingRoot(PathBuf),
    /// The path is not an existing directory.
    #[error("invalid task directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// The task directory has no task file.
    #[error("00_TASK.md not found in {}", .0.display())]
    MissingTaskFile(PathBuf),
    /// The task document is malformed.
    #[error(transparent)]
    Malformed(#[from] CanonicalizationError),
    /// Status evaluation failed.
    #[error(transparent)]
    Core(#[from] CoreError),
    /// The derived-state report could not be persisted.
    #[error("failed to write {}: {source}", path.display())]
    Persist {
        /// Report path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
