//! Intent hash computation.
//!
//! An intent hash is `sha256(canonical intent blob)`, rendered as lowercase hex.
//! The `intent_hash` field itself never enters the blob, so a document can
//! carry its own hash.

use crate::{CanonicalizationError, Canonicalizer, IntentDigest, StoredHash};

/// Computes the intent hash of raw document text.
///
/// # Example
///
/// ```rust
/// use taskmark_canonical::{compute_intent_hash, Canonicalizer};
///
/// let text = "---\nid: t-1\ntitle: Demo\nkind: feature\nscope: minor\nrisk: low\n\
///             epistemic_state: candidate\nconfidence: low\norigin: human\n\
///             lifecycle_state: inactive\ncreated_at: 2026-01-09T10:00:00Z\n---\n\
///             ## Goal\n\nShip the demo.\n";
///
/// let digest = compute_intent_hash(text, &Canonicalizer::default())?;
/// assert_eq!(digest.hex.len(), 64);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`CanonicalizationError`] if the document is malformed.
pub fn compute_intent_hash(
    text: &str,
    canonicalizer: &Canonicalizer,
) -> Result<IntentDigest, CanonicalizationError> {
    let result = canonicalizer.canonicalize(text)?;
    Ok(IntentDigest::of_blob(&result.blob))
}

/// Verifies the `intent_hash` a document records against its content.
///
/// Returns `Ok(None)` when no digest is recorded (absent or placeholder),
/// otherwise whether the recorded digest matches.
///
/// # Errors
///
/// Returns [`CanonicalizationError`] if the document is malformed.
pub fn verify_intent_hash(
    text: &str,
    canonicalizer: &Canonicalizer,
) -> Result<Option<bool>, CanonicalizationError> {
    let document = canonicalizer.parse(text)?;
    let stored = StoredHash::classify(document.field("intent_hash"));
    if !matches!(stored, StoredHash::Recorded(_)) {
        return Ok(None);
    }
    let computed = IntentDigest::of_blob(&canonicalizer.canonicalize_parsed(&document).blob);
    Ok(Some(!stored.mismatches(&computed)))
}
