//! Collaborator seams for the closure engine.
//!
//! The chain itself is pure; these traits describe what the surrounding
//! service plugs in:
//!
//! - `AuthorityResolver` answers which roles an identity holds in a scope
//! - `TransitionPolicy`  decides which roles may perform which event types
//! - `CaseStore`         holds case files and serializes appends per case
//!
//! All are injected at construction time.  Nothing in the engine reaches for
//! a global client or cluster connection.

use casechain_contracts::{
    authority::{AuthorityRequest, AuthorityResponse},
    case::CaseFile,
    error::ClosureResult,
    event::{CandidateEvent, ClosureEvent},
    state::ClosureEventType,
};

use casechain_audit::ChainReport;

/// Role lookup against the authority collaborator.
pub trait AuthorityResolver: Send + Sync {
    /// Return every role bound to `request.user_id` within
    /// `(request.env, request.system)`.
    ///
    /// An identity with no bindings yields an empty role list, not an error.
    /// Errors mean the lookup itself failed.
    fn resolve(&self, request: &AuthorityRequest) -> ClosureResult<AuthorityResponse>;
}

/// Which roles may perform which lifecycle events.
///
/// Implementations must deny by default: a role never mentioned for an event
/// type is not permitted to perform it.
pub trait TransitionPolicy: Send + Sync {
    fn permits(&self, event_type: ClosureEventType, role: &str) -> bool;
}

/// A keyed collection of case files.
///
/// Appends to one case must be serialized: reading `last_hash` and writing
/// the new event, head, and state happen as one unit.  Different cases are
/// independent.
pub trait CaseStore: Send + Sync {
    /// Add an existing case file.  Its chain is verified before it is accepted.
    fn insert(&self, case: CaseFile) -> ClosureResult<()>;

    /// Snapshot of the case as of now.
    fn get(&self, case_id: &str) -> ClosureResult<CaseFile>;

    /// Append one event to the named case and return the sealed event.
    fn append(&self, case_id: &str, candidate: CandidateEvent) -> ClosureResult<ClosureEvent>;

    /// Verify the named case's chain.
    fn verify(&self, case_id: &str) -> ClosureResult<ChainReport>;

    /// Every known case id, sorted.
    fn case_ids(&self) -> ClosureResult<Vec<String>>;
}
