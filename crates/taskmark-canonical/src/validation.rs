use thiserror::Error;

/// Validation errors for canonical primitives.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// When a value does not match the required pattern.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a tag names an algorithm this build cannot compute.
    #[error("unsupported {field} '{value}'")]
    Unsupported {
        /// Field name that carried the tag.
        field: &'static str,
        /// Offending value.
        value: String,
    },
}
