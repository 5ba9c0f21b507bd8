//! Nav command implementation.

use crate::path;
use serde_json::json;
use taskmark_canonical::Canonicalizer;
use taskmark_store::{ChronologyEntry, NavigationError, TaskRoot};

/// Which task to navigate to.
pub enum Target {
    First,
    Last,
    Next(String),
    Prev(String),
    Unspecified,
}

impl Target {
    pub fn from_flags(first: bool, last: bool, next: Option<String>, prev: Option<String>) -> Self {
        if first {
            Target::First
        } else if last {
            Target::Last
        } else if let Some(id) = next {
            Target::Next(id)
        } else if let Some(id) = prev {
            Target::Prev(id)
        } else {
            Target::Unspecified
        }
    }
}

pub fn run(
    root: String,
    target: Target,
    json: bool,
    show_path: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if matches!(target, Target::Unspecified) {
        return Err("Must specify --next, --prev, --first, or --last".into());
    }

    let root_path = path::validate_input_path(&root).map_err(|e| format!("Invalid root: {}", e))?;
    let index = TaskRoot::open(root_path, Canonicalizer::default())?.index()?;

    if index.is_empty() {
        if json {
            println!("{}", json!({ "error": "No tasks found", "result": null }));
        }
        return Err(NavigationError::Empty.into());
    }

    let found: Result<Option<&ChronologyEntry>, NavigationError> = match &target {
        Target::First => Ok(index.first()),
        Target::Last => Ok(index.last()),
        Target::Next(id) => index.next(id),
        Target::Prev(id) => index.previous(id),
        Target::Unspecified => Ok(None),
    };
    let found = match found {
        Ok(found) => found,
        Err(e) => {
            if json {
                println!("{}", json!({ "error": e.to_string(), "result": null }));
            }
            return Err(e.into());
        }
    };

    match found {
        Some(entry) if json => println!(
            "{}",
            json!({
                "result": entry.id,
                "path": entry.path.display().to_string(),
                "created_at": entry.created_at,
            })
        ),
        Some(entry) if show_path => println!("{}", entry.path.display()),
        Some(entry) => println!("{}", entry.id),
        None if json => println!("{}", json!({ "result": null, "reason": "At boundary" })),
        None => {}
    }

    Ok(())
}
