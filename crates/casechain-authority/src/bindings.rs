//! Decoding of authority bindings.
//!
//! The authority service exposes bindings as a list resource:
//!
//! ```json
//! { "items": [ { "metadata": { … }, "spec": {
//!     "subject": { "id": "alice", "type": "user" },
//!     "scope":   { "env": "prod", "system": "vault" },
//!     "roles":   ["Owner"] } } ] }
//! ```
//!
//! Decoding runs in two phases:
//!
//! 1. **Structural**: the raw payload is validated against the embedded JSON
//!    Schema.  All violations are collected into one error.
//! 2. **Typed**: the validated payload is decoded once into
//!    `AuthorityBinding`s with `serde`.
//!
//! A payload that fails either phase is rejected whole; no partial binding
//! set is ever returned.

use std::sync::OnceLock;

use jsonschema::Validator;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use casechain_contracts::{
    authority::AuthorityBinding,
    error::{ClosureError, ClosureResult},
};

/// JSON Schema for the binding list payload.
pub const BINDING_LIST_SCHEMA: &str = include_str!("../schema/authority-binding-list.json");

static BINDING_LIST_VALIDATOR: OnceLock<Result<Validator, String>> = OnceLock::new();

/// The compiled binding list schema.  Compiled on first use, then shared.
pub(crate) fn binding_list_validator() -> ClosureResult<&'static Validator> {
    BINDING_LIST_VALIDATOR
        .get_or_init(|| {
            let schema: Value = serde_json::from_str(BINDING_LIST_SCHEMA)
                .map_err(|e| format!("embedded binding schema is not valid JSON: {e}"))?;
            jsonschema::validator_for(&schema)
                .map_err(|e| format!("invalid binding JSON Schema document: {e}"))
        })
        .as_ref()
        .map_err(|reason| ClosureError::ConfigError {
            reason: reason.clone(),
        })
}

#[derive(Debug, Deserialize)]
struct BindingList {
    items: Vec<BindingItem>,
}

#[derive(Debug, Deserialize)]
struct BindingItem {
    spec: AuthorityBinding,
}

#[derive(Debug, Deserialize)]
struct BindingFile {
    #[serde(default)]
    bindings: Vec<AuthorityBinding>,
}

/// Validate and decode a binding list payload.
///
/// # Errors
///
/// `Serialization` listing every schema violation (with its JSON pointer),
/// or the serde decoding failure.  `ConfigError` if the embedded schema
/// itself cannot be compiled.
pub fn decode_binding_list(payload: &Value) -> ClosureResult<Vec<AuthorityBinding>> {
    let validator = binding_list_validator()?;

    let violations: Vec<String> = validator
        .iter_errors(payload)
        .map(|error| format!("at '{}': {}", error.instance_path, error))
        .collect();

    if !violations.is_empty() {
        warn!(
            violation_count = violations.len(),
            "authority binding payload failed schema validation"
        );
        return Err(ClosureError::Serialization {
            reason: format!("binding list violates schema: {}", violations.join("; ")),
        });
    }

    let list: BindingList = serde_json::from_value(payload.clone()).map_err(|e| ClosureError::Serialization {
        reason: format!("failed to decode binding list: {e}"),
    })?;

    Ok(list.items.into_iter().map(|item| item.spec).collect())
}

/// Parse raw JSON text, then validate and decode it as a binding list.
pub fn decode_binding_list_str(payload: &str) -> ClosureResult<Vec<AuthorityBinding>> {
    let value: Value = serde_json::from_str(payload).map_err(|e| ClosureError::Serialization {
        reason: format!("binding list is not valid JSON: {e}"),
    })?;
    decode_binding_list(&value)
}

/// Parse a local TOML bindings file (`[[bindings]]` entries).
pub fn bindings_from_toml_str(s: &str) -> ClosureResult<Vec<AuthorityBinding>> {
    let file: BindingFile = toml::from_str(s).map_err(|e| ClosureError::ConfigError {
        reason: format!("failed to parse bindings TOML: {e}"),
    })?;
    Ok(file.bindings)
}
