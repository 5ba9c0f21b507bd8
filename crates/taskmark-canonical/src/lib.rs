//! Canonical intent primitives for taskmark task records.
//!
//! A task document is markdown with a `---` frontmatter block. Only part of it
//! carries intent: an allow-list of frontmatter fields and the Goal,
//! Acceptance, Constraints and Dependencies sections. This crate projects that
//! part into a byte-exact intent blob and hashes it, so the hash survives
//! reformatting but not a change of meaning.
//!
#![deny(missing_docs)]

/// Intent blob construction.
pub mod canonicalizer;
/// Digest primitives and the recorded-hash tri-state.
pub mod digest;
/// Frontmatter parsers.
pub mod frontmatter;
/// Hygiene report types emitted during canonicalization.
pub mod hygiene;
/// Intent hash compute/verify helpers.
pub mod intent_hash;
/// Canonical body sections.
pub mod sections;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{
    split_regions, CanonicalizationError, CanonicalizationResult, Canonicalizer, DocumentRegions,
    ParsedDocument, DELIMITER, INTENT_FIELDS, REQUIRED_FIELDS,
};
pub use digest::{abbreviate, DigestAlg, IntentDigest, StoredHash, INTENT_HASH_SCOPE};
pub use frontmatter::{default_parser, FieldValue, Frontmatter, FrontmatterParser, SimpleFrontmatterParser};
#[cfg(feature = "yaml")]
pub use frontmatter::YamlFrontmatterParser;
pub use hygiene::{unify_line_endings, HygieneReport, HygieneStatus, HygieneWarning};
pub use intent_hash::{compute_intent_hash, verify_intent_hash};
pub use sections::{CANONICAL_SECTIONS, EXCLUDED_SECTIONS};
pub use validation::ValidationError;
