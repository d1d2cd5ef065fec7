//! # casechain-authority
//!
//! The authority collaborator for casechain: who holds which role where, and
//! which roles may perform which closure events.
//!
//! ## Overview
//!
//! - [`BindingResolver`] and [`LiveBindingResolver`] implement
//!   [`AuthorityResolver`](casechain_core::traits::AuthorityResolver) from
//!   authority bindings.  Binding list payloads are schema-validated, then
//!   decoded once into typed bindings.
//! - [`TomlRolePolicy`] implements
//!   [`TransitionPolicy`](casechain_core::traits::TransitionPolicy) from a
//!   deny-by-default TOML document.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use casechain_authority::{BindingResolver, TomlRolePolicy};
//! use casechain_core::ClosureEngine;
//!
//! let resolver = BindingResolver::from_file(Path::new("bindings.toml"))?;
//! let engine = ClosureEngine::new(Box::new(resolver), Box::new(TomlRolePolicy::builtin()?));
//! ```

pub mod bindings;
pub mod policy;
pub mod resolver;
pub mod rule;

pub use bindings::{bindings_from_toml_str, decode_binding_list, decode_binding_list_str};
pub use policy::{TomlRolePolicy, BUILTIN_ROLE_POLICY};
pub use resolver::{resolve_roles, BindingResolver, BindingSource, LiveBindingResolver};
pub use rule::{PermissionRule, RolePolicyConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────
