//! Typed view over a parsed task document.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use taskmark_canonical::{CanonicalizationError, Canonicalizer, FieldValue, ParsedDocument, StoredHash};

use crate::time::parse_rfc3339;

/// Id reported for a document without a usable `id` value.
pub const UNKNOWN_ID: &str = "unknown";

/// Validation state of a task's intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpistemicState {
    /// Proposed, not yet reviewed.
    Candidate,
    /// Reviewed and accepted.
    Validated,
    /// Reviewed and rejected, or withdrawn.
    Invalidated,
    /// Any other label, kept verbatim.
    Other(String),
}

impl EpistemicState {
    /// Maps a frontmatter label to a state.
    pub fn from_label(label: &str) -> Self {
        match label {
            "candidate" => EpistemicState::Candidate,
            "validated" => EpistemicState::Validated,
            "invalidated" => EpistemicState::Invalidated,
            other => EpistemicState::Other(other.to_string()),
        }
    }

    /// Label as written in frontmatter.
    pub fn as_str(&self) -> &str {
        match self {
            EpistemicState::Candidate => "candidate",
            EpistemicState::Validated => "validated",
            EpistemicState::Invalidated => "invalidated",
            EpistemicState::Other(label) => label,
        }
    }
}

impl fmt::Display for EpistemicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EpistemicState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Whether a task is currently being executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    /// Not started or parked.
    Inactive,
    /// In progress.
    Active,
    /// Any other label, kept verbatim.
    Other(String),
}

impl LifecycleState {
    /// Maps a frontmatter label to a state.
    pub fn from_label(label: &str) -> Self {
        match label {
            "inactive" => LifecycleState::Inactive,
            "active" => LifecycleState::Active,
            other => LifecycleState::Other(other.to_string()),
        }
    }

    /// Label as written in frontmatter.
    pub fn as_str(&self) -> &str {
        match self {
            LifecycleState::Inactive => "inactive",
            LifecycleState::Active => "active",
            LifecycleState::Other(label) => label,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LifecycleState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A well-formed task document together with the text it was parsed from.
#[derive(Debug, Clone)]
pub struct TaskDocument {
    parsed: ParsedDocument,
    text: String,
}

impl TaskDocument {
    /// Parses `text`, failing on missing delimiters or required fields.
    pub fn parse(text: impl Into<String>, canonicalizer: &Canonicalizer) -> Result<Self, CanonicalizationError> {
        let text = text.into();
        let parsed = canonicalizer.parse(&text)?;
        Ok(Self { parsed, text })
    }

    /// Raw document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed frontmatter and body.
    pub fn parsed(&self) -> &ParsedDocument {
        &self.parsed
    }

    /// Raw frontmatter value for `key`.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.parsed.field(key)
    }

    /// Task id, or `"unknown"` when empty.
    pub fn id(&self) -> String {
        self.parsed
            .field_text("id")
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| UNKNOWN_ID.to_string())
    }

    /// Epistemic state; a missing value reads as an empty `Other`.
    pub fn epistemic_state(&self) -> EpistemicState {
        EpistemicState::from_label(&self.parsed.field_text("epistemic_state").unwrap_or_default())
    }

    /// Lifecycle state; a missing value reads as an empty `Other`.
    pub fn lifecycle_state(&self) -> LifecycleState {
        LifecycleState::from_label(&self.parsed.field_text("lifecycle_state").unwrap_or_default())
    }

    /// `created_at`, when present and parseable.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("created_at")
    }

    /// `last_reviewed_at`, when present and parseable.
    pub fn last_reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("last_reviewed_at")
    }

    /// `expires_at`, when present and parseable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("expires_at")
    }

    /// Recorded `intent_hash`, classified.
    pub fn stored_hash(&self) -> StoredHash {
        StoredHash::classify(self.parsed.field("intent_hash"))
    }

    fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.parsed.field_text(key)?;
        if raw.trim().is_empty() {
            return None;
        }
        let parsed = parse_rfc3339(&raw);
        if parsed.is_none() {
            tracing::warn!(task_id = %self.id(), field = key, value = %raw, "unparseable timestamp");
        }
        parsed
    }
}
