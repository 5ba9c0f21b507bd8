//! Where task text comes from.

use std::io;

/// A readable task document.
///
/// The status engine reads a source twice: once to parse the document and
/// once to recompute the intent digest from the bytes currently on record.
pub trait TaskSource {
    /// Path or other human-readable locator, used in errors and logs.
    fn locator(&self) -> String;

    /// Reads the full current text.
    fn read_text(&self) -> io::Result<String>;
}

/// In-memory source.
#[derive(Debug, Clone)]
pub struct TextSource {
    locator: String,
    text: String,
}

impl TextSource {
    /// Wraps `text` under the given locator.
    pub fn new(locator: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            text: text.into(),
        }
    }
}

impl TaskSource for TextSource {
    fn locator(&self) -> String {
        self.locator.clone()
    }

    fn read_text(&self) -> io::Result<String> {
        Ok(self.text.clone())
    }
}
