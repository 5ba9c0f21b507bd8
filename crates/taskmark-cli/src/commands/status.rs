//! Status command implementation.

use crate::output;
use taskmark_canonical::Canonicalizer;
use taskmark_core::{now_utc, parse_rfc3339, StalenessPolicy, StatusEngine};
use taskmark_store::ReportWriter;

use super::open_task;

pub fn run(
    task: String,
    json: bool,
    no_write: bool,
    now: Option<String>,
    staleness_days: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let task_dir = open_task(&task)?;

    let now = match now {
        Some(ts) => parse_rfc3339(&ts).ok_or_else(|| format!("Invalid RFC3339 timestamp: {}", ts))?,
        None => now_utc(),
    };

    let engine = StatusEngine::new(Canonicalizer::default(), StalenessPolicy::new(staleness_days));
    let status = task_dir.evaluate(&engine, now)?;

    if !no_write {
        task_dir.write_report(&status)?;
    }

    if json {
        println!("{}", output::format_json(&status));
    } else {
        println!("{}", output::format_status_summary(&status));
    }

    Ok(())
}
