//! Canonical body-section extraction.

use std::sync::OnceLock;

use regex::Regex;

use crate::hygiene::HygieneReport;

/// Body sections that carry intent, in canonical order.
pub const CANONICAL_SECTIONS: [&str; 4] = ["Goal", "Acceptance", "Constraints", "Dependencies"];

/// Body sections that never carry intent.
pub const EXCLUDED_SECTIONS: [&str; 1] = ["Evidence"];

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

fn section_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^##\s+(.+)$").expect("invalid regex"))
}

/// Returns the section name if `line` is a `## <Name>` header.
pub fn header_name(line: &str) -> Option<&str> {
    section_header()
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Keeps only the canonical sections of `body`.
///
/// A canonical header opens a section and is itself kept. Every other header,
/// excluded or unknown, closes the current section and contributes nothing.
/// Inside a kept section, comment lines are dropped whole.
pub fn extract_canonical_sections(body: &str, report: &mut HygieneReport) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut in_canonical = false;
    let mut comment_lines = 0u64;
    let mut excluded_hits = 0u64;

    for line in body.split('\n') {
        if let Some(name) = header_name(line) {
            if CANONICAL_SECTIONS.contains(&name) {
                in_canonical = true;
                report.sections_kept.push(name.to_string());
                kept.push(line);
            } else {
                if EXCLUDED_SECTIONS.contains(&name) {
                    excluded_hits += 1;
                }
                in_canonical = false;
                report.sections_skipped.push(name.to_string());
            }
            continue;
        }

        if !in_canonical {
            continue;
        }

        if is_comment_line(line) {
            comment_lines += 1;
            continue;
        }
        kept.push(line);
    }

    report.record("CommentLines", "comment_lines_dropped", comment_lines);
    report.record("ExcludedSection", "excluded_sections", excluded_hits);
    tracing::debug!(
        kept = report.sections_kept.len(),
        skipped = report.sections_skipped.len(),
        "extracted canonical sections"
    );

    kept.join("\n")
}

fn is_comment_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with(COMMENT_OPEN) || trimmed.ends_with(COMMENT_CLOSE) || line.contains(COMMENT_OPEN)
}
