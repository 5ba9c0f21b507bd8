use taskmark_canonical::CanonicalizationError;
use thiserror::Error;

/// Core error types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The document text could not be read.
    #[error("failed to read {locator}: {source}")]
    Read {
        /// Path or other locator of the document.
        locator: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document is malformed (missing delimiter or required fields).
    #[error(transparent)]
    Malformed(#[from] CanonicalizationError),
}
