//! Closure events and the candidate form callers submit for appending.
//!
//! A `CandidateEvent` is what a caller proposes.  Once the engine accepts it,
//! the candidate is sealed into a `ClosureEvent` that additionally carries the
//! chain linkage (`prev_hash`) and its own digest (`hash`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{ClosureEventType, ClosureState};

/// One hash-linked lifecycle transition recorded against a case file.
///
/// Immutable once appended.  Modifying any field invalidates `hash` and, via
/// `prev_hash`, every event after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureEvent {
    /// When the event was produced (UTC).  Non-decreasing along the chain.
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "type")]
    pub event_type: ClosureEventType,

    pub actor_id: String,

    /// The role the actor claimed when performing the transition.
    pub actor_role: String,

    /// Free-text justification.  Never empty.
    pub reason: String,

    pub to_state: ClosureState,

    /// Lowercase hex SHA-256 over this event's content and `prev_hash`.
    pub hash: String,

    /// The chain head before this event, or `""` for the first event.
    pub prev_hash: String,
}

impl ClosureEvent {
    /// Borrow the hashed content of this event.
    pub fn content(&self) -> EventContent<'_> {
        EventContent {
            event_type: self.event_type,
            actor_id: &self.actor_id,
            actor_role: &self.actor_role,
            reason: &self.reason,
            to_state: self.to_state,
            timestamp: self.timestamp,
        }
    }
}

/// A proposed event that has not yet been validated or linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: ClosureEventType,
    pub actor_id: String,
    pub actor_role: String,
    pub reason: String,
    pub to_state: ClosureState,
}

impl CandidateEvent {
    /// Build a candidate stamped with the current time whose `to_state` is the
    /// target state of `event_type`.
    pub fn new(
        event_type: ClosureEventType,
        actor_id: impl Into<String>,
        actor_role: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type,
            actor_id: actor_id.into(),
            actor_role: actor_role.into(),
            reason: reason.into(),
            to_state: event_type.target_state(),
        }
    }

    pub fn escalate(
        actor_id: impl Into<String>,
        actor_role: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(ClosureEventType::Escalate, actor_id, actor_role, reason)
    }

    pub fn acknowledge(
        actor_id: impl Into<String>,
        actor_role: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(ClosureEventType::Acknowledge, actor_id, actor_role, reason)
    }

    pub fn close(
        actor_id: impl Into<String>,
        actor_role: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(ClosureEventType::Close, actor_id, actor_role, reason)
    }

    /// Replace the timestamp, e.g. when replaying events with known times.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn content(&self) -> EventContent<'_> {
        EventContent {
            event_type: self.event_type,
            actor_id: &self.actor_id,
            actor_role: &self.actor_role,
            reason: &self.reason,
            to_state: self.to_state,
            timestamp: self.timestamp,
        }
    }

    /// Seal the candidate into a chain event with the given linkage.
    pub fn seal(self, prev_hash: String, hash: String) -> ClosureEvent {
        ClosureEvent {
            timestamp: self.timestamp,
            event_type: self.event_type,
            actor_id: self.actor_id,
            actor_role: self.actor_role,
            reason: self.reason,
            to_state: self.to_state,
            hash,
            prev_hash,
        }
    }
}

/// Borrowed view of the fields an event hash commits to (besides `prev_hash`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventContent<'a> {
    pub event_type: ClosureEventType,
    pub actor_id: &'a str,
    pub actor_role: &'a str,
    pub reason: &'a str,
    pub to_state: ClosureState,
    pub timestamp: DateTime<Utc>,
}
