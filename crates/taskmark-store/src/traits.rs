//! Storage backend traits.

use std::path::PathBuf;

use taskmark_core::DerivedStatus;

use crate::error::StoreError;
use crate::view::ChronologyEntry;

/// Enumerates the tasks a backend holds, in no particular order.
pub trait TaskCatalog {
    /// Lists navigable tasks. Entries that cannot be read are skipped.
    fn entries(&self) -> Result<Vec<ChronologyEntry>, StoreError>;
}

/// Persists derived-state reports.
///
/// The report is a cache of a [`DerivedStatus`], never an input to it.
pub trait ReportWriter {
    /// Writes the report for `status`, returning where it landed.
    fn write_report(&self, status: &DerivedStatus) -> Result<PathBuf, StoreError>;
}
