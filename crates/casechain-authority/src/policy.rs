//! TOML-driven role policy.
//!
//! `TomlRolePolicy` implements `TransitionPolicy`.  Evaluation:
//!
//! 1. Scan permission entries in declaration order.
//! 2. The first entry naming the event type and listing the role permits it.
//! 3. No such entry → denied.

use std::path::Path;

use tracing::debug;

use casechain_contracts::{
    error::{ClosureError, ClosureResult},
    state::ClosureEventType,
};
use casechain_core::traits::TransitionPolicy;

use crate::rule::RolePolicyConfig;

/// The shipped policy: ESCALATE by IncidentCommander, ACKNOWLEDGE by
/// Approver, CLOSE by Owner.
pub const BUILTIN_ROLE_POLICY: &str = include_str!("../policies/closure-roles.toml");

#[derive(Debug, Clone)]
pub struct TomlRolePolicy {
    config: RolePolicyConfig,
}

impl TomlRolePolicy {
    /// Parse `s` as a TOML role policy.
    ///
    /// Returns `ConfigError` if the TOML is malformed, names an unknown event
    /// type, or lists an empty role name.
    pub fn from_toml_str(s: &str) -> ClosureResult<Self> {
        let config: RolePolicyConfig = toml::from_str(s).map_err(|e| ClosureError::ConfigError {
            reason: format!("failed to parse role policy TOML: {}", e),
        })?;

        if let Some(rule) = config
            .permissions
            .iter()
            .find(|rule| rule.roles.iter().any(|r| r.trim().is_empty()))
        {
            return Err(ClosureError::ConfigError {
                reason: format!("permission for {} lists an empty role name", rule.event),
            });
        }

        Ok(Self { config })
    }

    /// Read and parse a role policy file.
    pub fn from_file(path: &Path) -> ClosureResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ClosureError::ConfigError {
            reason: format!("failed to read role policy '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The shipped default policy.
    pub fn builtin() -> ClosureResult<Self> {
        Self::from_toml_str(BUILTIN_ROLE_POLICY)
    }

    /// Every role permitted to perform `event_type`, in declaration order,
    /// without duplicates.
    pub fn permitted_roles(&self, event_type: ClosureEventType) -> Vec<&str> {
        let mut roles: Vec<&str> = Vec::new();
        for rule in self.config.permissions.iter().filter(|r| r.event == event_type) {
            for role in &rule.roles {
                if !roles.contains(&role.as_str()) {
                    roles.push(role);
                }
            }
        }
        roles
    }
}

impl TransitionPolicy for TomlRolePolicy {
    fn permits(&self, event_type: ClosureEventType, role: &str) -> bool {
        let permitted = self
            .config
            .permissions
            .iter()
            .any(|rule| rule.allows(event_type, role));

        debug!(event_type = %event_type, role = %role, permitted, "role policy evaluated");
        permitted
    }
}
