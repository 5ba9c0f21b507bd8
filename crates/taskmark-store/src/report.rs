//! Rendering of the `99_STATE.md` derived-state report.

use taskmark_canonical::abbreviate;
use taskmark_core::DerivedStatus;

/// Command named in the report banner.
pub const GENERATOR: &str = "taskmark status";

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn or_null<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "null".to_string())
}

/// Renders the report: a `derived_status:` frontmatter block in fixed key
/// order followed by a human-readable summary.
pub fn render_state_report(status: &DerivedStatus) -> String {
    let mut lines = frontmatter_lines(status);
    lines.push(String::new());
    lines.extend(summary_lines(status));
    lines.push(String::new());
    lines.join("\n")
}

fn frontmatter_lines(status: &DerivedStatus) -> Vec<String> {
    let mut lines = vec![
        "---".to_string(),
        "derived_status:".to_string(),
        format!("  computed_at: {}", quoted(&status.computed_at)),
        format!("  task_id: {}", quoted(&status.task_id)),
        format!("  epistemic_state: {}", status.epistemic_state),
        format!("  lifecycle_state: {}", status.lifecycle_state),
        format!("  is_stale: {}", status.is_stale),
        format!("  is_expired: {}", status.is_expired),
        format!("  stale_reason: {}", or_null(status.stale_reason.as_deref().map(quoted))),
        format!("  days_since_review: {}", or_null(status.days_since_review)),
        format!("  staleness_threshold: {}", status.staleness_threshold),
        format!("  hash_mismatch: {}", status.hash_mismatch),
        format!("  needs_revalidation: {}", status.needs_revalidation),
        format!("  execution_eligible: {}", status.execution_eligible),
        format!("  activation_eligible: {}", status.activation_eligible),
    ];
    if let Some(reasons) = &status.refusal_reasons {
        lines.push("refusal_reasons:".to_string());
        lines.extend(reasons.iter().map(|reason| format!("  - {}", quoted(reason))));
    }
    lines.push("---".to_string());
    lines
}

fn summary_lines(status: &DerivedStatus) -> Vec<String> {
    let hash_or_none = |hash: &Option<String>| {
        hash.as_deref()
            .map(abbreviate)
            .unwrap_or_else(|| "None".to_string())
    };

    let mut lines = vec![
        "# Derived State".to_string(),
        String::new(),
        format!("> Auto-generated by `{}`. Do not edit manually.", GENERATOR),
        String::new(),
        "## Status Summary".to_string(),
        String::new(),
        "| Field | Value |".to_string(),
        "|-------|-------|".to_string(),
        format!("| Task ID | `{}` |", status.task_id),
        format!("| Epistemic State | `{}` |", status.epistemic_state),
        format!("| Lifecycle State | `{}` |", status.lifecycle_state),
        format!("| Stale | {} |", status.is_stale),
        format!("| Hash Mismatch | {} |", status.hash_mismatch),
        format!("| Needs Revalidation | {} |", status.needs_revalidation),
        format!("| Execution Eligible | {} |", status.execution_eligible),
        format!("| Activation Eligible | {} |", status.activation_eligible),
        String::new(),
        "## Chronology".to_string(),
        String::new(),
        format!(
            "- **Days Since Review**: {}",
            status
                .days_since_review
                .map(|d| d.to_string())
                .unwrap_or_else(|| "N/A".to_string())
        ),
        format!("- **Staleness Threshold**: {} days", status.staleness_threshold),
        format!(
            "- **Stale Reason**: {}",
            status.stale_reason.as_deref().unwrap_or("None")
        ),
        String::new(),
        "## Integrity".to_string(),
        String::new(),
        format!("- **Stored Hash**: `{}`", hash_or_none(&status.stored_hash)),
        format!("- **Computed Hash**: `{}`", hash_or_none(&status.computed_hash)),
        format!("- **Mismatch**: {}", status.hash_mismatch),
        format!("- **Check**: {}", integrity_label(status)),
    ];

    if let Some(reasons) = &status.refusal_reasons {
        lines.push(String::new());
        lines.push("## Refusal Reasons".to_string());
        lines.push(String::new());
        lines.extend(reasons.iter().map(|reason| format!("- {}", reason)));
    }
    lines
}

fn integrity_label(status: &DerivedStatus) -> &'static str {
    use taskmark_core::IntegrityCheck;
    match status.integrity {
        IntegrityCheck::Verified => "verified",
        IntegrityCheck::Mismatch => "mismatch",
        IntegrityCheck::NotRecorded => "not recorded",
        IntegrityCheck::Placeholder => "placeholder",
        IntegrityCheck::Unavailable => "unchecked",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmark_core::{EpistemicState, IntegrityCheck, LifecycleState};

    fn make_status() -> DerivedStatus {
        DerivedStatus {
            computed_at: "2026-01-20T00:00:00Z".into(),
            task_id: "demo".into(),
            epistemic_state: EpistemicState::Validated,
            lifecycle_state: LifecycleState::Active,
            is_stale: true,
            is_expired: false,
            stale_reason: Some("Last reviewed 19 days ago (threshold: 14)".into()),
            days_since_review: Some(19),
            staleness_threshold: 14,
            hash_mismatch: false,
            stored_hash: Some("{{intent_hash}}".into()),
            computed_hash: Some("a".repeat(64)),
            integrity: IntegrityCheck::Placeholder,
            digest_error: None,
            needs_revalidation: true,
            execution_eligible: false,
            activation_eligible: false,
            refusal_reasons: Some(vec!["Last reviewed 19 days ago (threshold: 14)".into()]),
        }
    }

    #[test]
    fn frontmatter_block_has_fixed_key_order() {
        let report = render_state_report(&make_status());
        let expected = "---\nderived_status:\n  computed_at: \"2026-01-20T00:00:00Z\"\n  \
task_id: \"demo\"\n  epistemic_state: validated\n  lifecycle_state: active\n  \
is_stale: true\n  is_expired: false\n  \
stale_reason: \"Last reviewed 19 days ago (threshold: 14)\"\n  days_since_review: 19\n  \
staleness_threshold: 14\n  hash_mismatch: false\n  needs_revalidation: true\n  \
execution_eligible: false\n  activation_eligible: false\nrefusal_reasons:\n  \
- \"Last reviewed 19 days ago (threshold: 14)\"\n---\n";
        assert!(report.starts_with(expected), "{report}");
    }

    #[test]
    fn refusal_reasons_read_back_as_strings() {
        let mut status = make_status();
        status.refusal_reasons = Some(vec![
            "Task not validated (state: candidate)".into(),
            "Expired at 2026-01-05T00:00:00Z".into(),
        ]);
        let report = render_state_report(&status);
        let block = report
            .strip_prefix("---\n")
            .and_then(|rest| rest.split_once("\n---\n"))
            .map(|(frontmatter, _)| frontmatter)
            .unwrap();

        let parsed: serde_yaml::Value = serde_yaml::from_str(block).unwrap();
        let reasons: Vec<&str> = parsed["refusal_reasons"]
            .as_sequence()
            .unwrap()
            .iter()
            .map(|reason| reason.as_str().unwrap())
            .collect();
        assert_eq!(
            reasons,
            ["Task not validated (state: candidate)", "Expired at 2026-01-05T00:00:00Z"]
        );
        assert_eq!(
            parsed["derived_status"]["stale_reason"].as_str(),
            Some("Last reviewed 19 days ago (threshold: 14)")
        );
        assert_eq!(parsed["derived_status"]["days_since_review"].as_i64(), Some(19));
    }

    #[test]
    fn report_ends_with_a_single_newline() {
        let report = render_state_report(&make_status());
        assert!(report.ends_with("- Last reviewed 19 days ago (threshold: 14)\n"));
        assert!(!report.ends_with("\n\n"));
    }

    #[test]
    fn hashes_are_abbreviated() {
        let report = render_state_report(&make_status());
        assert!(report.contains(&format!("- **Computed Hash**: `{}...`", "a".repeat(16))));
        assert!(report.contains("- **Stored Hash**: `{{intent_hash}}`"));
    }

    #[test]
    fn refusal_section_only_when_reasons_exist() {
        let mut status = make_status();
        assert!(render_state_report(&status).contains("## Refusal Reasons"));

        status.refusal_reasons = None;
        status.stale_reason = None;
        status.days_since_review = None;
        let report = render_state_report(&status);
        assert!(!report.contains("## Refusal Reasons"));
        assert!(!report.contains("refusal_reasons:"));
        assert!(report.contains("  stale_reason: null\n  days_since_review: null\n"));
        assert!(report.contains("- **Days Since Review**: N/A"));
    }
}
