use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// Hygiene status for a canonicalization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HygieneStatus {
    /// The input was already in canonical shape.
    Ok,
    /// Formatting noise was removed; the blob differs from a naive projection.
    Normalized,
}

/// Stable warning code emitted by canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HygieneWarning(String);

impl HygieneWarning {
    /// Creates a warning from a literal code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the warning code.
    pub fn code(&self) -> &str {
        &self.0
    }
}

/// What the canonicalizer stripped or rewrote while building an intent blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HygieneReport {
    /// Overall hygiene status.
    pub status: HygieneStatus,
    /// Stable warning codes, in first-seen order.
    pub warnings: Vec<HygieneWarning>,
    /// Counters such as rewritten line endings or dropped comment lines.
    pub metrics: BTreeMap<String, u64>,
    /// Canonical sections that contributed to the blob, in document order.
    pub sections_kept: Vec<String>,
    /// Section headers that ended inclusion without contributing.
    pub sections_skipped: Vec<String>,
    /// Frontmatter keys left out by the intent-field allow-list.
    pub fields_dropped: Vec<String>,
}

impl Default for HygieneReport {
    fn default() -> Self {
        Self {
            status: HygieneStatus::Ok,
            warnings: Vec::new(),
            metrics: BTreeMap::new(),
            sections_kept: Vec::new(),
            sections_skipped: Vec::new(),
            fields_dropped: Vec::new(),
        }
    }
}

impl HygieneReport {
    /// Records `count` occurrences of a normalization under `metric`.
    pub(crate) fn record(&mut self, code: &str, metric: &str, count: u64) {
        if count == 0 {
            return;
        }
        *self.metrics.entry(metric.to_string()).or_insert(0) += count;
        if !self.warnings.iter().any(|w| w.code() == code) {
            self.warnings.push(HygieneWarning::new(code));
        }
        self.status = HygieneStatus::Normalized;
    }
}

fn blank_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("invalid regex"))
}

/// Rewrites `\r\n` and lone `\r` to `\n`.
pub fn unify_line_endings(text: &str, report: &mut HygieneReport) -> String {
    let crlf = text.matches("\r\n").count() as u64;
    let unified = text.replace("\r\n", "\n");
    let lone_cr = unified.matches('\r').count() as u64;
    report.record("LineEndings", "line_endings_rewritten", crlf + lone_cr);
    unified.replace('\r', "\n")
}

/// Whitespace canonicalization applied to the assembled blob.
///
/// Line endings become `\n`, trailing whitespace is stripped from every line,
/// runs of three or more newlines collapse to two, and the whole text is
/// trimmed.
pub fn normalize_whitespace(text: &str, report: &mut HygieneReport) -> String {
    let unified = unify_line_endings(text, report);

    let mut stripped = 0u64;
    let lines: Vec<&str> = unified
        .split('\n')
        .map(|line| {
            let trimmed = line.trim_end();
            if trimmed.len() != line.len() {
                stripped += 1;
            }
            trimmed
        })
        .collect();
    report.record("TrailingWhitespace", "trailing_whitespace_lines", stripped);
    let joined = lines.join("\n");

    let runs = blank_run().find_iter(&joined).count() as u64;
    report.record("BlankLineRuns", "blank_runs_collapsed", runs);
    let collapsed = blank_run().replace_all(&joined, "\n\n");

    collapsed.trim().to_string()
}
