//! Wire types for the authority (role lookup) collaborator.
//!
//! The collaborator answers "which roles does this user hold in this
//! environment/system scope?".  Bindings are the declarations it answers
//! from; their JSON shape follows the cluster resource's `spec` block.

use serde::{Deserialize, Serialize};

use crate::case::CaseFile;

/// A role lookup request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorityRequest {
    pub user_id: String,
    pub env: String,
    pub system: String,
}

impl AuthorityRequest {
    pub fn new(
        user_id: impl Into<String>,
        env: impl Into<String>,
        system: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            env: env.into(),
            system: system.into(),
        }
    }

    /// A lookup for `user_id` scoped to the case's env and system.
    pub fn for_case(case: &CaseFile, user_id: impl Into<String>) -> Self {
        Self::new(user_id, case.env.clone(), case.system.clone())
    }
}

/// A role lookup response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityResponse {
    pub user_id: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl AuthorityResponse {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Declaration that a subject holds a set of roles within a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityBinding {
    pub subject: BindingSubject,
    pub scope: BindingScope,
    pub roles: Vec<String>,
}

/// Who a binding applies to.  Only `kind == "user"` subjects resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSubject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Where a binding applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingScope {
    pub env: String,
    pub system: String,
}
