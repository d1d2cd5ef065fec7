//! Role policy configuration schema.
//!
//! A `RolePolicyConfig` is deserialized from TOML and lists, per closure
//! event type, the roles allowed to perform it.  An event type with no entry
//! cannot be performed by anyone.
//!
//! Example:
//! ```toml
//! [[permissions]]
//! event = "ACKNOWLEDGE"
//! roles = ["Approver"]
//! description = "Approvers acknowledge an escalated case"
//! ```

use serde::{Deserialize, Serialize};

use casechain_contracts::state::ClosureEventType;

/// One permission entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionRule {
    /// The event type this entry governs.
    pub event: ClosureEventType,

    /// Roles allowed to perform `event`.  Matched exactly, case-sensitive.
    pub roles: Vec<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl PermissionRule {
    pub fn allows(&self, event_type: ClosureEventType, role: &str) -> bool {
        self.event == event_type && self.roles.iter().any(|r| r == role)
    }
}

/// The top-level structure of a role policy file.
///
/// Several entries may name the same event; their roles are combined.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RolePolicyConfig {
    #[serde(default)]
    pub permissions: Vec<PermissionRule>,
}
