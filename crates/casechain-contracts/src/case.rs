//! The case file aggregate.
//!
//! A `CaseFile` is created `OPEN` with no events and is mutated only by the
//! append operation in `casechain-core`.  Owner and assignee are the one
//! exception: they are out-of-chain bookkeeping and may change freely.

use serde::{Deserialize, Serialize};

use crate::{
    error::{ClosureError, ClosureResult},
    event::ClosureEvent,
    state::ClosureState,
};

/// Per-incident record of lifecycle state and its hash-linked history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFile {
    /// Unique identifier, fixed at creation.
    pub case_id: String,

    /// Deployment/environment scope tag, fixed at creation.
    pub env: String,

    /// System scope tag, fixed at creation.
    pub system: String,

    /// Always the `to_state` of the last event, or `OPEN` with no events.
    pub current_state: ClosureState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,

    /// Append-only history.  Insertion order is chain order.
    pub events: Vec<ClosureEvent>,

    /// Cached chain head: the `hash` of the last event, or `""`.
    pub last_hash: String,
}

impl CaseFile {
    /// Create an `OPEN` case with an empty chain.
    pub fn open(
        case_id: impl Into<String>,
        env: impl Into<String>,
        system: impl Into<String>,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            env: env.into(),
            system: system.into(),
            current_state: ClosureState::Open,
            owner_id: None,
            assignee_id: None,
            events: Vec::new(),
            last_hash: String::new(),
        }
    }

    /// Create an `OPEN` case with a freshly generated UUID v4 identifier.
    pub fn open_with_generated_id(env: impl Into<String>, system: impl Into<String>) -> Self {
        Self::open(uuid::Uuid::new_v4().to_string(), env, system)
    }

    pub fn is_closed(&self) -> bool {
        self.current_state.is_terminal()
    }

    /// The most recently appended event, if any.
    pub fn head(&self) -> Option<&ClosureEvent> {
        self.events.last()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn assign_owner(&mut self, owner_id: impl Into<String>) {
        self.owner_id = Some(owner_id.into());
    }

    pub fn assign_to(&mut self, assignee_id: impl Into<String>) {
        self.assignee_id = Some(assignee_id.into());
    }

    /// Render the persisted JSON form.
    pub fn to_json_pretty(&self) -> ClosureResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ClosureError::Serialization {
            reason: format!("failed to encode case '{}': {}", self.case_id, e),
        })
    }

    /// Parse a persisted JSON case file.
    ///
    /// Decoding checks shape only.  Run chain verification before trusting
    /// the history.
    pub fn from_json(s: &str) -> ClosureResult<Self> {
        serde_json::from_str(s).map_err(|e| ClosureError::Serialization {
            reason: format!("failed to decode case file: {}", e),
        })
    }
}
