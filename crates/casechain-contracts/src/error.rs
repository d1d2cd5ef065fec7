//! Error taxonomy for the closure audit chain.
//!
//! Every fallible casechain operation returns `ClosureResult<T>`.  Errors are
//! local to one case file; nothing here is ever retried or repaired by the
//! library itself.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::state::{ClosureEventType, ClosureState};

/// The unified error type for casechain.
#[derive(Debug, Error)]
pub enum ClosureError {
    /// The candidate event is not a legal move from the case's current state.
    ///
    /// Covers any attempt to act on a `CLOSED` case and candidates whose
    /// `to_state` disagrees with the transition table.
    #[error("invalid transition: {event_type} -> {to_state} is not permitted from state {from}")]
    InvalidTransition {
        from: ClosureState,
        event_type: ClosureEventType,
        to_state: ClosureState,
    },

    /// The candidate event carries a blank justification.
    #[error("event reason must not be empty")]
    EmptyReason,

    /// Verification found broken linkage or a hash mismatch.
    ///
    /// `index` is the first offending event, or `events.len()` when the
    /// events themselves are sound but the cached head or state disagree.
    #[error("chain corrupted at event {index}: {reason}")]
    ChainCorrupted { index: usize, reason: String },

    /// A persisted representation could not be parsed into the data model.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// The actor does not hold the claimed role, or the role may not perform
    /// the requested event type.
    #[error("actor '{actor_id}' is not authorized as '{actor_role}': {reason}")]
    Unauthorized {
        actor_id: String,
        actor_role: String,
        reason: String,
    },

    /// The candidate event is older than the current chain head.
    #[error("event timestamp {attempted} precedes chain head timestamp {previous}")]
    TimestampRegression {
        previous: DateTime<Utc>,
        attempted: DateTime<Utc>,
    },

    /// The authority collaborator could not answer a role lookup.
    #[error("authority lookup failed: {reason}")]
    AuthorityUnavailable { reason: String },

    /// A required configuration document is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// No case with the given id is known to the store.
    #[error("case not found: {case_id}")]
    CaseNotFound { case_id: String },

    /// A case with the given id already exists in the store.
    #[error("case already exists: {case_id}")]
    DuplicateCase { case_id: String },

    /// The case store could not be accessed (e.g. a poisoned lock).
    #[error("case store error: {reason}")]
    StoreError { reason: String },
}

/// Convenience alias used throughout the casechain crates.
pub type ClosureResult<T> = Result<T, ClosureError>;
