//! Derived task status: staleness, intent integrity and eligibility.
//!
//! Nothing here is stored authority. Every field is recomputed from the task
//! document and the evaluation time, and the verdict only ever advises.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use taskmark_canonical::{Canonicalizer, IntentDigest, StoredHash};

use crate::config::StalenessPolicy;
use crate::document::{EpistemicState, LifecycleState, TaskDocument};
use crate::errors::CoreError;
use crate::source::TaskSource;
use crate::time::format_rfc3339;

/// Refusal reason for an invalidated task.
pub const REASON_INVALIDATED: &str = "Task is invalidated";

/// Refusal reason for an intent hash that no longer matches the content.
pub const REASON_HASH_MISMATCH: &str = "Intent hash mismatch - content changed since validation";

const SECONDS_PER_DAY: i64 = 86_400;

/// Review freshness of a task at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staleness {
    /// Whole days since the reference time, floored.
    pub days_since_review: Option<i64>,
    /// Threshold in days that was applied.
    pub threshold_days: u32,
    /// More than `threshold_days` have elapsed, or the task expired.
    pub is_stale: bool,
    /// `expires_at` lies in the past.
    pub is_expired: bool,
    /// Why the task is stale; expiry wins over age.
    pub reason: Option<String>,
}

impl Staleness {
    /// Assesses staleness against `reference` (last review, else creation).
    ///
    /// Age uses the exact elapsed duration, so one second past the threshold
    /// is already stale even though the floored day count equals it.
    pub fn assess(
        reference: Option<DateTime<Utc>>,
        expires_at: Option<DateTime<Utc>>,
        threshold_days: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let mut staleness = Staleness {
            days_since_review: None,
            threshold_days,
            is_stale: false,
            is_expired: false,
            reason: None,
        };

        if let Some(reference) = reference {
            let elapsed = now - reference;
            let days = elapsed.num_seconds().div_euclid(SECONDS_PER_DAY);
            staleness.days_since_review = Some(days);
            if elapsed > Duration::days(i64::from(threshold_days)) {
                staleness.is_stale = true;
                staleness.reason = Some(format!(
                    "Last reviewed {} days ago (threshold: {})",
                    days, threshold_days
                ));
            }
        }

        if let Some(expires_at) = expires_at {
            if now > expires_at {
                staleness.is_expired = true;
                staleness.is_stale = true;
                staleness.reason = Some(format!("Expired at {}", format_rfc3339(expires_at)));
            }
        }

        staleness
    }
}

/// Outcome of comparing the recorded intent hash with a fresh digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityCheck {
    /// Recorded hash equals the fresh digest.
    Verified,
    /// Recorded hash differs from the fresh digest.
    Mismatch,
    /// No hash recorded.
    NotRecorded,
    /// Only a template placeholder is recorded.
    Placeholder,
    /// The fresh digest could not be computed; nothing was compared.
    Unavailable,
}

/// Recorded vs. recomputed intent hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Integrity {
    /// Hash as recorded in the document.
    pub stored: StoredHash,
    /// Freshly computed digest, if computation succeeded.
    pub computed: Option<IntentDigest>,
    /// Comparison result.
    pub check: IntegrityCheck,
    /// Why the digest could not be computed.
    pub error: Option<String>,
}

impl Integrity {
    /// Compares `stored` with the outcome of recomputing the digest.
    pub fn assess(stored: StoredHash, computed: Result<IntentDigest, String>) -> Self {
        match computed {
            Err(error) => Integrity {
                stored,
                computed: None,
                check: IntegrityCheck::Unavailable,
                error: Some(error),
            },
            Ok(digest) => {
                let check = match &stored {
                    StoredHash::Absent => IntegrityCheck::NotRecorded,
                    StoredHash::Placeholder(_) => IntegrityCheck::Placeholder,
                    StoredHash::Recorded(_) if stored.mismatches(&digest) => IntegrityCheck::Mismatch,
                    StoredHash::Recorded(_) => IntegrityCheck::Verified,
                };
                Integrity {
                    stored,
                    computed: Some(digest),
                    check,
                    error: None,
                }
            }
        }
    }

    /// True only when a recorded hash was compared and differs.
    pub fn hash_mismatch(&self) -> bool {
        self.check == IntegrityCheck::Mismatch
    }
}

/// Advisory eligibility derived from state, staleness and integrity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Stale, drifted or invalidated.
    pub needs_revalidation: bool,
    /// Validated, active, fresh and intact.
    pub execution_eligible: bool,
    /// Validated, inactive, fresh and intact.
    pub activation_eligible: bool,
    /// Why the task is not trustworthy as-is; `None` when there is nothing.
    pub refusal_reasons: Option<Vec<String>>,
}

impl Verdict {
    /// Derives the verdict. Reasons are listed in a fixed order: invalidated,
    /// not validated (also raised for invalidated tasks), stale, hash mismatch.
    pub fn derive(
        epistemic: &EpistemicState,
        lifecycle: &LifecycleState,
        staleness: &Staleness,
        hash_mismatch: bool,
    ) -> Self {
        let validated = *epistemic == EpistemicState::Validated;
        let invalidated = *epistemic == EpistemicState::Invalidated;
        let trustworthy = validated && !staleness.is_stale && !hash_mismatch;

        let mut reasons = Vec::new();
        if invalidated {
            reasons.push(REASON_INVALIDATED.to_string());
        }
        if !validated {
            reasons.push(format!("Task not validated (state: {})", epistemic));
        }
        if staleness.is_stale {
            reasons.push(
                staleness
                    .reason
                    .clone()
                    .unwrap_or_else(|| "Task is stale".to_string()),
            );
        }
        if hash_mismatch {
            reasons.push(REASON_HASH_MISMATCH.to_string());
        }

        Verdict {
            needs_revalidation: staleness.is_stale || hash_mismatch || invalidated,
            execution_eligible: trustworthy && *lifecycle == LifecycleState::Active,
            activation_eligible: trustworthy && *lifecycle == LifecycleState::Inactive,
            refusal_reasons: (!reasons.is_empty()).then_some(reasons),
        }
    }
}

/// Full derived status of one task at one instant.
///
/// Field order matches the JSON and `99_STATE.md` layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedStatus {
    /// Evaluation time, `YYYY-MM-DDTHH:MM:SSZ`.
    pub computed_at: String,
    /// Task id.
    pub task_id: String,
    /// Epistemic state label.
    pub epistemic_state: EpistemicState,
    /// Lifecycle state label.
    pub lifecycle_state: LifecycleState,
    /// See [`Staleness::is_stale`].
    pub is_stale: bool,
    /// See [`Staleness::is_expired`].
    pub is_expired: bool,
    /// See [`Staleness::reason`].
    pub stale_reason: Option<String>,
    /// See [`Staleness::days_since_review`].
    pub days_since_review: Option<i64>,
    /// Threshold that was applied.
    pub staleness_threshold: u32,
    /// Recorded hash differs from the recomputed one.
    pub hash_mismatch: bool,
    /// Recorded `intent_hash` text, placeholders included.
    pub stored_hash: Option<String>,
    /// Recomputed digest.
    pub computed_hash: Option<String>,
    /// Integrity comparison outcome.
    pub integrity: IntegrityCheck,
    /// Why the digest could not be recomputed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest_error: Option<String>,
    /// See [`Verdict::needs_revalidation`].
    pub needs_revalidation: bool,
    /// See [`Verdict::execution_eligible`].
    pub execution_eligible: bool,
    /// See [`Verdict::activation_eligible`].
    pub activation_eligible: bool,
    /// See [`Verdict::refusal_reasons`].
    pub refusal_reasons: Option<Vec<String>>,
}

/// Computes [`DerivedStatus`] for task documents.
#[derive(Debug, Default)]
pub struct StatusEngine {
    canonicalizer: Canonicalizer,
    policy: StalenessPolicy,
}

impl StatusEngine {
    /// Creates an engine.
    pub fn new(canonicalizer: Canonicalizer, policy: StalenessPolicy) -> Self {
        Self {
            canonicalizer,
            policy,
        }
    }

    /// Canonicalizer used for parsing and digests.
    pub fn canonicalizer(&self) -> &Canonicalizer {
        &self.canonicalizer
    }

    /// Evaluates an already parsed document, hashing its own text.
    pub fn evaluate(&self, document: &TaskDocument, now: DateTime<Utc>) -> DerivedStatus {
        let digest = IntentDigest::of_blob(&self.canonicalizer.canonicalize_parsed(document.parsed()).blob);
        self.derive(document, Ok(digest), now)
    }

    /// Reads, parses and evaluates a task source.
    ///
    /// A malformed document is an error. The digest is recomputed from a
    /// second read of the source; if that read or its canonicalization fails
    /// the status is still produced, with the integrity check marked
    /// unavailable and no mismatch reported.
    pub fn evaluate_source<S: TaskSource + ?Sized>(
        &self,
        source: &S,
        now: DateTime<Utc>,
    ) -> Result<DerivedStatus, CoreError> {
        let locator = source.locator();
        let text = source.read_text().map_err(|source| CoreError::Read {
            locator: locator.clone(),
            source,
        })?;
        let document = TaskDocument::parse(text, &self.canonicalizer)?;

        let digest = source
            .read_text()
            .map_err(|e| format!("failed to re-read {}: {}", locator, e))
            .and_then(|fresh| {
                self.canonicalizer
                    .canonicalize(&fresh)
                    .map(|result| IntentDigest::of_blob(&result.blob))
                    .map_err(|e| e.to_string())
            });
        if let Err(reason) = &digest {
            tracing::warn!(task = %locator, %reason, "intent digest unavailable");
        }

        Ok(self.derive(&document, digest, now))
    }

    fn derive(
        &self,
        document: &TaskDocument,
        digest: Result<IntentDigest, String>,
        now: DateTime<Utc>,
    ) -> DerivedStatus {
        let task_id = document.id();
        let threshold = self.policy.threshold_for(document);
        let reference = document.last_reviewed_at().or_else(|| document.created_at());
        let staleness = Staleness::assess(reference, document.expires_at(), threshold, now);
        let integrity = Integrity::assess(document.stored_hash(), digest);
        let epistemic = document.epistemic_state();
        let lifecycle = document.lifecycle_state();
        let verdict = Verdict::derive(&epistemic, &lifecycle, &staleness, integrity.hash_mismatch());

        tracing::debug!(
            task_id = %task_id,
            stale = staleness.is_stale,
            integrity = ?integrity.check,
            execution_eligible = verdict.execution_eligible,
            "derived task status"
        );

        DerivedStatus {
            computed_at: format_rfc3339(now),
            task_id,
            epistemic_state: epistemic,
            lifecycle_state: lifecycle,
            is_stale: staleness.is_stale,
            is_expired: staleness.is_expired,
            stale_reason: staleness.reason,
            days_since_review: staleness.days_since_review,
            staleness_threshold: staleness.threshold_days,
            hash_mismatch: integrity.hash_mismatch(),
            stored_hash: integrity.stored.as_str().map(str::to_string),
            computed_hash: integrity.computed.map(|d| d.hex),
            integrity: integrity.check,
            digest_error: integrity.error,
            needs_revalidation: verdict.needs_revalidation,
            execution_eligible: verdict.execution_eligible,
            activation_eligible: verdict.activation_eligible,
            refusal_reasons: verdict.refusal_reasons,
        }
    }
}
