//! Intent command implementation.

use crate::output;
use serde_json::json;
use taskmark_canonical::Canonicalizer;

use super::{open_task, read_task_text};

pub fn run(task: String, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let task_dir = open_task(&task)?;
    let text = read_task_text(&task_dir)?;

    let result = Canonicalizer::default()
        .canonicalize(&text)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;

    if json {
        let value = json!({
            "task_dir": task_dir.path().display().to_string(),
            "canonical_blob": result.blob,
            "blob_length": result.blob.len(),
            "hygiene": result.report,
        });
        println!("{}", output::format_json(&value));
    } else {
        println!("{}", result.blob);
    }

    Ok(())
}
