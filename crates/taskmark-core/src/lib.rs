//! Task document model and derived-status engine.
//!
//! The engine turns a task document plus an evaluation time into a
//! [`DerivedStatus`]: staleness, intent-hash integrity and advisory
//! eligibility. Evaluation is pure apart from reading the document.

#![deny(missing_docs)]

/// Staleness configuration.
pub mod config;
/// Typed task document view.
pub mod document;
/// Error types.
pub mod errors;
/// Task text sources.
pub mod source;
/// Status derivation.
pub mod status;
/// Timestamp helpers.
pub mod time;

pub use config::{StalenessPolicy, DEFAULT_STALENESS_DAYS, THRESHOLD_FIELD};
pub use document::{EpistemicState, LifecycleState, TaskDocument, UNKNOWN_ID};
pub use errors::CoreError;
pub use source::{TaskSource, TextSource};
pub use status::{
    DerivedStatus, Integrity, IntegrityCheck, Staleness, StatusEngine, Verdict,
    REASON_HASH_MISMATCH, REASON_INVALIDATED,
};
pub use time::{format_rfc3339, now_utc, offset, parse_rfc3339, RFC3339_UTC_FORMAT};
