//! Filesystem storage for taskmark task records.
//!
//! This crate provides:
//! - `TaskDir`, one task document (`00_TASK.md`) plus its derived-state report
//!   (`99_STATE.md`), written atomically
//! - `TaskRoot`, discovery of task directories under a root
//! - `ChronologyIndex`, newest-first navigation over discovered tasks
//! - `TaskCatalog` and `ReportWriter` traits for other backends

#![deny(missing_docs)]

/// Error types for store operations.
pub mod error;
/// Derived-state report rendering.
pub mod report;
/// Task root discovery.
pub mod root;
/// Task directory backend.
pub mod taskdir;
/// Storage backend traits.
pub mod traits;
/// Chronology navigation.
pub mod view;

pub use error::StoreError;
pub use report::{render_state_report, GENERATOR};
pub use root::TaskRoot;
pub use taskdir::{TaskDir, STATE_FILE, TASK_FILE};
pub use traits::{ReportWriter, TaskCatalog};
pub use view::{ChronologyEntry, ChronologyIndex, NavigationError};
