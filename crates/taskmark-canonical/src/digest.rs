use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::frontmatter::FieldValue;
use crate::validation::ValidationError;

/// Scope tag recorded next to intent hashes (`intent_hash_scope`).
pub const INTENT_HASH_SCOPE: &str = "canonical-intent";

/// Prefix of template placeholders left in `intent_hash` before first hashing.
pub const PLACEHOLDER_PREFIX: &str = "{{";

/// Literal placeholder token accepted in `intent_hash`.
pub const PLACEHOLDER_TOKEN: &str = "placeholder";

/// Supported intent digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlg {
    /// SHA-256 over the UTF-8 intent blob, lowercase hex.
    #[serde(rename = "sha256-v1")]
    Sha256V1,
}

impl DigestAlg {
    /// Tag as written to `intent_hash_algo`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlg::Sha256V1 => "sha256-v1",
        }
    }
}

impl fmt::Display for DigestAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlg {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sha256-v1" => Ok(DigestAlg::Sha256V1),
            other => Err(ValidationError::Unsupported {
                field: "intent_hash_algo",
                value: other.to_string(),
            }),
        }
    }
}

fn hex_digest_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9a-f]{64}$").expect("invalid regex"))
}

/// Algorithm + lowercase hex digest of an intent blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntentDigest {
    /// Digest algorithm.
    pub alg: DigestAlg,
    /// 64 lowercase hex characters.
    pub hex: String,
}

impl IntentDigest {
    /// Constructs a validated digest.
    pub fn new(alg: DigestAlg, hex: impl Into<String>) -> Result<Self, ValidationError> {
        let hex = hex.into();
        if !hex_digest_pattern().is_match(&hex) {
            return Err(ValidationError::PatternMismatch {
                field: "intent_hash",
                value: hex,
            });
        }
        Ok(IntentDigest { alg, hex })
    }

    /// Hashes an intent blob.
    pub fn of_blob(blob: &str) -> Self {
        let hash = Sha256::digest(blob.as_bytes());
        IntentDigest {
            alg: DigestAlg::Sha256V1,
            hex: hex::encode(hash),
        }
    }
}

impl fmt::Display for IntentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

/// Truncates long hash strings to 16 characters plus `...`.
pub fn abbreviate(value: &str) -> String {
    match value.char_indices().nth(16) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}

/// The `intent_hash` field as recorded in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum StoredHash {
    /// No hash recorded (missing, `null` or empty).
    Absent,
    /// A template placeholder; never compared.
    Placeholder(String),
    /// A recorded digest, compared verbatim.
    Recorded(String),
}

impl StoredHash {
    /// Classifies the raw `intent_hash` frontmatter value.
    pub fn classify(value: Option<&FieldValue>) -> Self {
        let raw = match value {
            None | Some(FieldValue::Null) => return StoredHash::Absent,
            Some(FieldValue::String(s)) => s.trim().to_string(),
            Some(other) => other.to_string(),
        };
        if raw.is_empty() {
            StoredHash::Absent
        } else if raw.starts_with(PLACEHOLDER_PREFIX) || raw.eq_ignore_ascii_case(PLACEHOLDER_TOKEN) {
            StoredHash::Placeholder(raw)
        } else {
            let stored = StoredHash::Recorded(raw);
            if let Some(Err(e)) = stored.well_formed_digest() {
                tracing::warn!(error = %e, "recorded intent_hash is not a sha256-v1 digest");
            }
            stored
        }
    }

    /// Validates a recorded value as a `sha256-v1` digest; `None` unless
    /// recorded. A malformed value still compares verbatim (and mismatches).
    pub fn well_formed_digest(&self) -> Option<Result<(), ValidationError>> {
        match self {
            StoredHash::Recorded(raw) => {
                Some(IntentDigest::new(DigestAlg::Sha256V1, raw.as_str()).map(|_| ()))
            }
            StoredHash::Absent | StoredHash::Placeholder(_) => None,
        }
    }

    /// Raw recorded text, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoredHash::Absent => None,
            StoredHash::Placeholder(s) | StoredHash::Recorded(s) => Some(s),
        }
    }

    /// True only for a recorded digest that differs from `computed`.
    pub fn mismatches(&self, computed: &IntentDigest) -> bool {
        match self {
            StoredHash::Recorded(recorded) => recorded != &computed.hex,
            StoredHash::Absent | StoredHash::Placeholder(_) => false,
        }
    }
}
