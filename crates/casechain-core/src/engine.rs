//! The closure engine: atomic append, with and without authorization.
//!
//! `append_event` is the chain operation itself:
//!
//!   validate reason → validate transition → check time order
//!     → hash against `last_hash` → push event → advance head and state
//!
//! Every check runs before the first write, so a rejected candidate leaves
//! the case file exactly as it was.  `append_event` does not log; it returns
//! errors for the host to surface.
//!
//! `ClosureEngine` wraps that operation with an authorization gate backed by
//! the injected `AuthorityResolver` and `TransitionPolicy`.

use tracing::{debug, info, warn};

use casechain_audit::hash_event;
use casechain_contracts::{
    authority::AuthorityRequest,
    case::CaseFile,
    error::{ClosureError, ClosureResult},
    event::{CandidateEvent, ClosureEvent},
    state::ClosureEventType,
};

use crate::{
    traits::{AuthorityResolver, TransitionPolicy},
    transition::validate_candidate,
};

/// Append `candidate` to `case` as a single indivisible transition.
///
/// On success the event is linked to the previous chain head, pushed onto
/// `events`, and becomes the new head; `current_state` moves to its
/// `to_state`.  Returns the sealed event.
///
/// # Errors
///
/// - `EmptyReason` if the reason is blank
/// - `InvalidTransition` if the candidate is not legal from the current state
///   (always the case once the case is `CLOSED`)
/// - `TimestampRegression` if the candidate is older than the chain head
///
/// In every error case `case` is untouched.
pub fn append_event(case: &mut CaseFile, candidate: CandidateEvent) -> ClosureResult<&ClosureEvent> {
    let next_state = validate_candidate(case, &candidate)?;

    if let Some(head) = case.events.last() {
        if candidate.timestamp < head.timestamp {
            return Err(ClosureError::TimestampRegression {
                previous: head.timestamp,
                attempted: candidate.timestamp,
            });
        }
    }

    let prev_hash = case.last_hash.clone();
    let hash = hash_event(&prev_hash, &candidate.content());
    let event = candidate.seal(prev_hash, hash.clone());

    // No fallible step below this line.
    case.events.push(event);
    case.last_hash = hash;
    case.current_state = next_state;

    Ok(&case.events[case.events.len() - 1])
}

/// Proof that an actor was checked against the authority collaborator for a
/// specific event type on a specific case and scope.
///
/// Only `ClosureEngine::authorize` constructs one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedActor {
    actor_id: String,
    actor_role: String,
    event_type: ClosureEventType,
    case_id: String,
    env: String,
    system: String,
}

impl AuthorizedActor {
    pub fn actor_id(&self) -> &str {
        &self.actor_id
    }

    pub fn actor_role(&self) -> &str {
        &self.actor_role
    }

    pub fn event_type(&self) -> ClosureEventType {
        self.event_type
    }

    pub fn case_id(&self) -> &str {
        &self.case_id
    }

    /// True if this authorization covers appending `candidate` to `case`.
    ///
    /// The case id and its `(env, system)` scope must both match the ones the
    /// roles were resolved for.
    pub fn covers(&self, case: &CaseFile, candidate: &CandidateEvent) -> bool {
        self.case_id == case.case_id
            && self.env == case.env
            && self.system == case.system
            && self.actor_id == candidate.actor_id
            && self.actor_role == candidate.actor_role
            && self.event_type == candidate.event_type
    }
}

/// Appends events only for actors whose claimed role is both bound to them
/// in the case's scope and permitted for the event type.
pub struct ClosureEngine {
    resolver: Box<dyn AuthorityResolver>,
    policy: Box<dyn TransitionPolicy>,
}

impl ClosureEngine {
    pub fn new(resolver: Box<dyn AuthorityResolver>, policy: Box<dyn TransitionPolicy>) -> Self {
        Self { resolver, policy }
    }

    /// Check the candidate's `(actor_id, actor_role)` for `case`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` if the role is not permitted for the event type or the
    /// actor does not hold it in `(case.env, case.system)`.  Resolver
    /// failures are passed through unchanged.
    pub fn authorize(&self, case: &CaseFile, candidate: &CandidateEvent) -> ClosureResult<AuthorizedActor> {
        let deny = |reason: String| {
            warn!(
                case_id = %case.case_id,
                actor_id = %candidate.actor_id,
                actor_role = %candidate.actor_role,
                event_type = %candidate.event_type,
                reason = %reason,
                "closure event not authorized"
            );
            ClosureError::Unauthorized {
                actor_id: candidate.actor_id.clone(),
                actor_role: candidate.actor_role.clone(),
                reason,
            }
        };

        // Policy first: no point asking the collaborator about a role that
        // could never perform this event.
        if !self.policy.permits(candidate.event_type, &candidate.actor_role) {
            return Err(deny(format!(
                "role '{}' may not perform {}",
                candidate.actor_role, candidate.event_type
            )));
        }

        let request = AuthorityRequest::for_case(case, candidate.actor_id.clone());
        let response = self.resolver.resolve(&request)?;

        debug!(
            case_id = %case.case_id,
            actor_id = %candidate.actor_id,
            roles = ?response.roles,
            "resolved actor roles"
        );

        if response.user_id != candidate.actor_id {
            return Err(deny(format!(
                "authority answered for '{}' instead",
                response.user_id
            )));
        }

        if !response.has_role(&candidate.actor_role) {
            return Err(deny(format!(
                "role '{}' is not bound to the actor in {}/{}",
                candidate.actor_role, case.env, case.system
            )));
        }

        Ok(AuthorizedActor {
            actor_id: candidate.actor_id.clone(),
            actor_role: candidate.actor_role.clone(),
            event_type: candidate.event_type,
            case_id: case.case_id.clone(),
            env: case.env.clone(),
            system: case.system.clone(),
        })
    }

    /// Validate, authorize, then append.
    ///
    /// Check order: reason, transition, authorization, time order.  Nothing
    /// is written unless all pass.
    pub fn append<'c>(
        &self,
        case: &'c mut CaseFile,
        candidate: CandidateEvent,
    ) -> ClosureResult<&'c ClosureEvent> {
        validate_candidate(case, &candidate)?;
        let authorized = self.authorize(case, &candidate)?;
        self.append_authorized(case, &authorized, candidate)
    }

    /// Append a candidate previously cleared by `authorize`.
    ///
    /// Rejects with `Unauthorized` if the authorization was issued for a
    /// different case, scope, actor, role, or event type.
    pub fn append_authorized<'c>(
        &self,
        case: &'c mut CaseFile,
        authorized: &AuthorizedActor,
        candidate: CandidateEvent,
    ) -> ClosureResult<&'c ClosureEvent> {
        if !authorized.covers(case, &candidate) {
            warn!(
                case_id = %case.case_id,
                authorized_case_id = %authorized.case_id,
                actor_id = %candidate.actor_id,
                "authorization does not cover this append"
            );
            return Err(ClosureError::Unauthorized {
                actor_id: candidate.actor_id,
                actor_role: candidate.actor_role,
                reason: format!(
                    "authorization was issued to '{}' as '{}' for {} on case '{}' in {}/{}",
                    authorized.actor_id,
                    authorized.actor_role,
                    authorized.event_type,
                    authorized.case_id,
                    authorized.env,
                    authorized.system
                ),
            });
        }

        let case_id = case.case_id.clone();
        let event = append_event(case, candidate)?;

        info!(
            case_id = %case_id,
            event_type = %event.event_type,
            actor_id = %event.actor_id,
            to_state = %event.to_state,
            hash = %event.hash,
            "closure event appended"
        );

        Ok(event)
    }
}
