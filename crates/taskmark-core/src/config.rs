//! Staleness configuration.

use crate::document::TaskDocument;

/// Default number of days a task may go unreviewed before it is stale.
pub const DEFAULT_STALENESS_DAYS: u32 = 14;

/// Frontmatter field that overrides the default threshold per document.
pub const THRESHOLD_FIELD: &str = "staleness_days_threshold";

/// Staleness threshold policy: a default plus the per-document override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessPolicy {
    /// Threshold applied when a document does not declare its own.
    pub default_threshold_days: u32,
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self {
            default_threshold_days: DEFAULT_STALENESS_DAYS,
        }
    }
}

impl StalenessPolicy {
    /// Creates a policy with a custom default threshold.
    pub fn new(default_threshold_days: u32) -> Self {
        Self {
            default_threshold_days,
        }
    }

    /// Resolves the threshold for `document`.
    ///
    /// A missing or `null` override falls back to the default; so does an
    /// override that is not a non-negative integer, with a warning.
    pub fn threshold_for(&self, document: &TaskDocument) -> u32 {
        let Some(value) = document.field(THRESHOLD_FIELD) else {
            return self.default_threshold_days;
        };
        if value.is_null() {
            return self.default_threshold_days;
        }
        match value.as_integer().and_then(|days| u32::try_from(days).ok()) {
            Some(days) => days,
            None => {
                tracing::warn!(
                    task_id = %document.id(),
                    value = %value,
                    "ignoring invalid {}",
                    THRESHOLD_FIELD
                );
                self.default_threshold_days
            }
        }
    }
}
