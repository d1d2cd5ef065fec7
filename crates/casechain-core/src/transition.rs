//! Transition validation.
//!
//! Legal moves (anything else is rejected):
//!
//! | current state | event type  | to_state     |
//! |---------------|-------------|--------------|
//! | OPEN          | ESCALATE    | ESCALATED    |
//! | ESCALATED     | ACKNOWLEDGE | ACKNOWLEDGED |
//! | ACKNOWLEDGED  | CLOSE       | CLOSED       |

use casechain_contracts::{
    case::CaseFile,
    error::{ClosureError, ClosureResult},
    event::CandidateEvent,
    state::{ClosureEventType, ClosureState},
};

/// Check that `event_type` may move a case out of `current` into `to_state`.
///
/// Returns the resulting state.  A `to_state` that disagrees with the table
/// is rejected even when the event type itself would be legal.
pub fn validate_transition(
    current: ClosureState,
    event_type: ClosureEventType,
    to_state: ClosureState,
) -> ClosureResult<ClosureState> {
    match current.next(event_type) {
        Some(next) if next == to_state => Ok(next),
        _ => Err(ClosureError::InvalidTransition {
            from: current,
            event_type,
            to_state,
        }),
    }
}

/// Check a candidate's justification and transition against a case.
///
/// The reason is checked first: a blank reason is `EmptyReason` regardless
/// of the case's state.
pub fn validate_candidate(case: &CaseFile, candidate: &CandidateEvent) -> ClosureResult<ClosureState> {
    if candidate.reason.trim().is_empty() {
        return Err(ClosureError::EmptyReason);
    }
    validate_transition(case.current_state, candidate.event_type, candidate.to_state)
}
