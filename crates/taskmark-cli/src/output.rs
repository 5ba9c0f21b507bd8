//! Output formatting utilities.

use serde::Serialize;
use taskmark_core::DerivedStatus;
use taskmark_store::ChronologyEntry;

/// Formats a value as pretty JSON, keeping struct field order.
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Condensed human-readable status.
pub fn format_status_summary(status: &DerivedStatus) -> String {
    let mut lines = vec![
        format!("Task: {}", status.task_id),
        format!("  Epistemic: {}", status.epistemic_state),
        format!("  Lifecycle: {}", status.lifecycle_state),
        format!("  Stale: {}", status.is_stale),
        format!("  Hash Mismatch: {}", status.hash_mismatch),
        format!("  Needs Revalidation: {}", status.needs_revalidation),
        format!("  Execution Eligible: {}", status.execution_eligible),
    ];
    if let Some(reasons) = &status.refusal_reasons {
        lines.push("  Refusal Reasons:".to_string());
        lines.extend(reasons.iter().map(|reason| format!("    - {}", reason)));
    }
    lines.join("\n")
}

/// Formats a task as a simple table row.
pub fn format_table_row(entry: &ChronologyEntry) -> String {
    let created_at = if entry.created_at.is_empty() {
        "?"
    } else {
        entry.created_at.as_str()
    };
    format!(
        "{:<32} {:<25} {}",
        truncate(&entry.id, 32),
        truncate(created_at, 25),
        entry.path.display()
    )
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!("{:<32} {:<25} {}", "ID", "CREATED_AT", "PATH");
    println!("{}", "-".repeat(80));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééé", 6), "ééé...");
    }
}
