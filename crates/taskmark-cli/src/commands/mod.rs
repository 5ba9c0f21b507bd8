//! Command implementations.

pub mod hash;
pub mod intent;
pub mod list;
pub mod nav;
pub mod status;
pub mod time;

use crate::path;
use taskmark_store::TaskDir;

/// Opens the task directory named on the command line.
fn open_task(task: &str) -> Result<TaskDir, String> {
    let task_path =
        path::validate_input_path(task).map_err(|e| format!("Invalid task directory: {}", e))?;
    TaskDir::open(&task_path).map_err(|e| e.to_string())
}

/// Reads a task document's text.
fn read_task_text(task_dir: &TaskDir) -> Result<String, String> {
    use taskmark_core::TaskSource;
    task_dir.read_text().map_err(|e| {
        let sanitized = path::sanitize_path_for_error(&task_dir.task_file());
        format!("Failed to read {}: {}", sanitized, e)
    })
}
