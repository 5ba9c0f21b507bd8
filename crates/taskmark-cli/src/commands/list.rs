//! List command implementation.

use crate::output;
use crate::path;
use taskmark_canonical::Canonicalizer;
use taskmark_store::TaskRoot;

pub fn run(root: String, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let root_path = path::validate_input_path(&root).map_err(|e| format!("Invalid root: {}", e))?;
    let task_root = TaskRoot::open(&root_path, Canonicalizer::default()).map_err(|e| {
        let sanitized = path::sanitize_path_for_error(&root_path);
        format!("Failed to open task root {}: {}", sanitized, e)
    })?;
    let index = task_root.index()?;

    if !json {
        output::print_table_header();
    }

    for entry in index.entries() {
        if json {
            println!("{}", serde_json::to_string(entry)?);
        } else {
            println!("{}", output::format_table_row(entry));
        }
    }

    Ok(())
}
