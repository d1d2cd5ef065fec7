//! Lifecycle states and event types.
//!
//! Both enums serialize as their upper-case names (`"OPEN"`, `"ESCALATE"`, …)
//! so persisted case files read the same as the audit vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The governance state of an incident case.
///
/// `Open` is the only initial state; `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClosureState {
    #[default]
    Open,
    Escalated,
    Acknowledged,
    Closed,
}

impl ClosureState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClosureState::Open => "OPEN",
            ClosureState::Escalated => "ESCALATED",
            ClosureState::Acknowledged => "ACKNOWLEDGED",
            ClosureState::Closed => "CLOSED",
        }
    }

    /// True once no further event may be appended.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClosureState::Closed)
    }

    /// The lifecycle transition table.
    ///
    /// Returns the state reached by applying `event_type` in this state, or
    /// `None` when the pair is illegal.  The table is strictly linear:
    /// `OPEN -> ESCALATED -> ACKNOWLEDGED -> CLOSED`, with nothing leaving
    /// `CLOSED`.  Reopening an incident means opening a new case.
    pub fn next(&self, event_type: ClosureEventType) -> Option<ClosureState> {
        match (self, event_type) {
            (ClosureState::Open, ClosureEventType::Escalate) => Some(ClosureState::Escalated),
            (ClosureState::Escalated, ClosureEventType::Acknowledge) => {
                Some(ClosureState::Acknowledged)
            }
            (ClosureState::Acknowledged, ClosureEventType::Close) => Some(ClosureState::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for ClosureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The intent recorded on a closure event.
///
/// Each type has exactly one target state.  The type is redundant with the
/// event's `to_state` but is kept as an explicit statement of intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClosureEventType {
    Escalate,
    Acknowledge,
    Close,
}

impl ClosureEventType {
    /// Every event type, in lifecycle order.
    pub const ALL: [ClosureEventType; 3] = [
        ClosureEventType::Escalate,
        ClosureEventType::Acknowledge,
        ClosureEventType::Close,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClosureEventType::Escalate => "ESCALATE",
            ClosureEventType::Acknowledge => "ACKNOWLEDGE",
            ClosureEventType::Close => "CLOSE",
        }
    }

    /// The state a case enters when an event of this type is appended.
    pub fn target_state(&self) -> ClosureState {
        match self {
            ClosureEventType::Escalate => ClosureState::Escalated,
            ClosureEventType::Acknowledge => ClosureState::Acknowledged,
            ClosureEventType::Close => ClosureState::Closed,
        }
    }
}

impl fmt::Display for ClosureEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
