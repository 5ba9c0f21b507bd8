//! Path validation for command arguments.

use std::path::{Path, PathBuf};

/// Validates a user-supplied path argument.
pub fn validate_input_path(input: &str) -> Result<PathBuf, String> {
    if input.trim().is_empty() {
        return Err("path is empty".to_string());
    }
    if input.contains('\0') {
        return Err("path contains a NUL byte".to_string());
    }
    Ok(PathBuf::from(input))
}

/// Renders a path for error messages with control characters masked.
pub fn sanitize_path_for_error(path: &Path) -> String {
    path.display()
        .to_string()
        .chars()
        .map(|c| if c.is_control() { '?' } else { c })
        .collect()
}
