use crate::frontmatter::{default_parser, FieldValue, Frontmatter, FrontmatterParser};
use crate::hygiene::{normalize_whitespace, unify_line_endings, HygieneReport};
use crate::sections::extract_canonical_sections;

/// Frontmatter delimiter.
pub const DELIMITER: &str = "---";

/// Fields every task document must declare.
pub const REQUIRED_FIELDS: [&str; 10] = [
    "id",
    "title",
    "kind",
    "scope",
    "risk",
    "epistemic_state",
    "confidence",
    "origin",
    "lifecycle_state",
    "created_at",
];

/// Frontmatter fields that carry intent, sorted.
///
/// `intent_hash` is deliberately absent: the recorded digest must not feed its
/// own hash input.
pub const INTENT_FIELDS: [&str; 15] = [
    "blocked_by",
    "confidence",
    "created_at",
    "depends_on",
    "epistemic_state",
    "id",
    "intent_hash_algo",
    "intent_hash_scope",
    "kind",
    "lifecycle_state",
    "origin",
    "risk",
    "scope",
    "tags",
    "title",
];

/// Error returned when a document cannot be canonicalized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizationError {
    /// Text does not start with the frontmatter delimiter.
    #[error("malformed document: missing frontmatter delimiter '---' at start of file")]
    MissingOpeningDelimiter,
    /// Only one delimiter was found.
    #[error("malformed document: missing closing frontmatter delimiter '---'")]
    MissingClosingDelimiter,
    /// One or more required frontmatter fields are absent.
    #[error("malformed document: missing required frontmatter fields: {}", .0.join(", "))]
    MissingRequiredFields(Vec<String>),
    /// The frontmatter block could not be parsed.
    #[error("malformed document: invalid frontmatter: {0}")]
    InvalidFrontmatter(String),
}

/// Frontmatter and body regions of a document, before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentRegions<'a> {
    /// Text between the first two delimiters, trimmed.
    pub frontmatter: &'a str,
    /// Everything after the second delimiter.
    pub body: &'a str,
}

/// Splits raw text at the first two delimiters.
pub fn split_regions(text: &str) -> Result<DocumentRegions<'_>, CanonicalizationError> {
    let rest = text
        .strip_prefix(DELIMITER)
        .ok_or(CanonicalizationError::MissingOpeningDelimiter)?;
    let (frontmatter, body) = rest
        .split_once(DELIMITER)
        .ok_or(CanonicalizationError::MissingClosingDelimiter)?;
    Ok(DocumentRegions {
        frontmatter: frontmatter.trim(),
        body,
    })
}

/// A document whose frontmatter parsed and carries every required field.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    /// Parsed frontmatter.
    pub frontmatter: Frontmatter,
    /// Raw body text.
    pub body: String,
}

impl ParsedDocument {
    /// Looks up a frontmatter field.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.frontmatter.get(key)
    }

    /// Looks up a string field, rendering non-string scalars.
    pub fn field_text(&self, key: &str) -> Option<String> {
        match self.frontmatter.get(key)? {
            FieldValue::Null => None,
            value => Some(value.to_string()),
        }
    }
}

/// Result of canonicalization.
#[derive(Debug, Clone)]
pub struct CanonicalizationResult {
    /// Canonical intent blob.
    pub blob: String,
    /// Hygiene report describing what was normalized away.
    pub report: HygieneReport,
}

impl CanonicalizationResult {
    /// Canonical UTF-8 bytes of the blob.
    pub fn bytes(&self) -> &[u8] {
        self.blob.as_bytes()
    }
}

/// Canonicalizer that turns task documents into intent blobs.
pub struct Canonicalizer {
    parser: Box<dyn FrontmatterParser>,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new(default_parser())
    }
}

impl std::fmt::Debug for Canonicalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canonicalizer")
            .field("parser", &self.parser.name())
            .finish()
    }
}

impl Canonicalizer {
    /// Creates a canonicalizer around the provided frontmatter parser.
    pub fn new(parser: Box<dyn FrontmatterParser>) -> Self {
        Self { parser }
    }

    /// The frontmatter parser in use.
    pub fn parser(&self) -> &dyn FrontmatterParser {
        self.parser.as_ref()
    }

    /// Splits and parses a document and checks required fields.
    ///
    /// Line endings are unified first, so the body and frontmatter are always
    /// `\n`-separated.
    pub fn parse(&self, text: &str) -> Result<ParsedDocument, CanonicalizationError> {
        self.parse_into(text, &mut HygieneReport::default())
    }

    fn parse_into(&self, text: &str, report: &mut HygieneReport) -> Result<ParsedDocument, CanonicalizationError> {
        let unified = unify_line_endings(text, report);
        let regions = split_regions(&unified)?;
        let frontmatter = self.parser.parse(regions.frontmatter)?;

        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| !frontmatter.contains_key(**field))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CanonicalizationError::MissingRequiredFields(missing));
        }

        Ok(ParsedDocument {
            frontmatter,
            body: regions.body.to_string(),
        })
    }

    /// Produces the intent blob + hygiene report for raw document text.
    pub fn canonicalize(&self, text: &str) -> Result<CanonicalizationResult, CanonicalizationError> {
        let mut report = HygieneReport::default();
        let document = self.parse_into(text, &mut report)?;
        Ok(self.assemble(&document, report))
    }

    /// Produces the intent blob for an already parsed document.
    pub fn canonicalize_parsed(&self, document: &ParsedDocument) -> CanonicalizationResult {
        self.assemble(document, HygieneReport::default())
    }

    fn assemble(&self, document: &ParsedDocument, mut report: HygieneReport) -> CanonicalizationResult {
        let frontmatter = serialize_frontmatter(&document.frontmatter, &mut report);
        let body = extract_canonical_sections(&document.body, &mut report);
        let assembled = format!("{DELIMITER}\n{frontmatter}\n{DELIMITER}\n{body}");
        let blob = normalize_whitespace(&assembled, &mut report);

        tracing::debug!(
            parser = self.parser.name(),
            bytes = blob.len(),
            status = ?report.status,
            "canonicalized intent blob"
        );

        CanonicalizationResult { blob, report }
    }
}

/// Re-emits allow-listed fields in key order.
fn serialize_frontmatter(frontmatter: &Frontmatter, report: &mut HygieneReport) -> String {
    let mut lines = Vec::new();
    for (key, value) in frontmatter {
        if !INTENT_FIELDS.contains(&key.as_str()) {
            report.fields_dropped.push(key.clone());
            continue;
        }
        match value {
            FieldValue::List(items) => {
                lines.push(format!("{key}:"));
                for item in items {
                    lines.push(format!("  - {item}"));
                }
            }
            FieldValue::String(s) if needs_quotes(s) => lines.push(format!("{key}: \"{s}\"")),
            scalar => lines.push(format!("{key}: {scalar}")),
        }
    }
    lines.join("\n")
}

fn needs_quotes(value: &str) -> bool {
    value.contains('\n') || value.contains(':') || value.contains('"')
}
