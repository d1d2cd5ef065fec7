//! `AuthorityResolver` implementations backed by authority bindings.
//!
//! A binding contributes its roles to a request when all hold:
//!
//! - the subject is a `user` (group subjects are ignored)
//! - the subject id equals the requested user id
//! - the scope's env and system both equal the request's
//!
//! Roles from every contributing binding are merged, de-duplicated, and
//! returned sorted.

use std::{collections::BTreeSet, path::Path};

use tracing::debug;

use casechain_contracts::{
    authority::{AuthorityBinding, AuthorityRequest, AuthorityResponse},
    error::{ClosureError, ClosureResult},
};
use casechain_core::traits::AuthorityResolver;

use crate::bindings::{bindings_from_toml_str, decode_binding_list_str};

const USER_SUBJECT: &str = "user";

/// Collect the roles `bindings` grant for `request`.
pub fn resolve_roles(bindings: &[AuthorityBinding], request: &AuthorityRequest) -> AuthorityResponse {
    let roles: BTreeSet<&str> = bindings
        .iter()
        .filter(|b| b.subject.kind == USER_SUBJECT && b.subject.id == request.user_id)
        .filter(|b| b.scope.env == request.env && b.scope.system == request.system)
        .flat_map(|b| b.roles.iter().map(String::as_str))
        .collect();

    AuthorityResponse {
        user_id: request.user_id.clone(),
        roles: roles.into_iter().map(String::from).collect(),
    }
}

/// Resolves against a fixed snapshot of bindings.
#[derive(Debug, Clone, Default)]
pub struct BindingResolver {
    bindings: Vec<AuthorityBinding>,
}

impl BindingResolver {
    pub fn new(bindings: Vec<AuthorityBinding>) -> Self {
        Self { bindings }
    }

    /// Build from a binding list payload (schema-validated).
    pub fn from_binding_list_json(payload: &str) -> ClosureResult<Self> {
        decode_binding_list_str(payload).map(Self::new)
    }

    /// Build from a TOML bindings document.
    pub fn from_toml_str(s: &str) -> ClosureResult<Self> {
        bindings_from_toml_str(s).map(Self::new)
    }

    /// Read a bindings file.  `.json` files are treated as binding list
    /// payloads; anything else as TOML.
    pub fn from_file(path: &Path) -> ClosureResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ClosureError::ConfigError {
            reason: format!("failed to read bindings file '{}': {}", path.display(), e),
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_binding_list_json(&contents),
            _ => Self::from_toml_str(&contents),
        }
    }

    pub fn bindings(&self) -> &[AuthorityBinding] {
        &self.bindings
    }
}

impl AuthorityResolver for BindingResolver {
    fn resolve(&self, request: &AuthorityRequest) -> ClosureResult<AuthorityResponse> {
        let response = resolve_roles(&self.bindings, request);
        debug!(
            user_id = %request.user_id,
            env = %request.env,
            system = %request.system,
            roles = ?response.roles,
            "roles resolved from binding snapshot"
        );
        Ok(response)
    }
}

/// Where a live resolver fetches the binding list payload from.
///
/// The production implementation wraps the cluster API client; it is handed
/// to `LiveBindingResolver` at construction rather than held globally.
pub trait BindingSource: Send + Sync {
    /// Return the raw binding list payload (JSON text).
    fn fetch(&self) -> ClosureResult<String>;
}

/// Fetches and decodes the binding list on every lookup.
pub struct LiveBindingResolver {
    source: Box<dyn BindingSource>,
}

impl LiveBindingResolver {
    pub fn new(source: Box<dyn BindingSource>) -> Self {
        Self { source }
    }
}

impl AuthorityResolver for LiveBindingResolver {
    fn resolve(&self, request: &AuthorityRequest) -> ClosureResult<AuthorityResponse> {
        let payload = self.source.fetch().map_err(|e| match e {
            ClosureError::AuthorityUnavailable { .. } => e,
            other => ClosureError::AuthorityUnavailable {
                reason: other.to_string(),
            },
        })?;
        let bindings = decode_binding_list_str(&payload)?;
        let response = resolve_roles(&bindings, request);

        debug!(
            user_id = %request.user_id,
            binding_count = bindings.len(),
            roles = ?response.roles,
            "roles resolved from live bindings"
        );
        Ok(response)
    }
}
