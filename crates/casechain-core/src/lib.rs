//! # casechain-core
//!
//! The closure lifecycle engine for casechain incident cases.
//!
//! This crate provides:
//! - Transition validation over the linear `OPEN → ESCALATED → ACKNOWLEDGED
//!   → CLOSED` lifecycle
//! - `append_event`, the atomic hash-linked append
//! - The collaborator traits (`AuthorityResolver`, `TransitionPolicy`,
//!   `CaseStore`) and `ClosureEngine`, which gates appends on them
//! - `InMemoryCaseStore`, which serializes appends per case
//!
//! ## Usage
//!
//! ```rust,ignore
//! use casechain_contracts::{case::CaseFile, event::CandidateEvent};
//! use casechain_core::append_event;
//!
//! let mut case = CaseFile::open("case-1", "prod", "vault");
//! append_event(&mut case, CandidateEvent::escalate("alice", "IncidentCommander", "risk detected"))?;
//! casechain_core::verify(&case)?;
//! ```

pub mod engine;
pub mod memory;
pub mod traits;
pub mod transition;

pub use casechain_audit::{verify_case as verify, ChainReport};
pub use engine::{append_event, AuthorizedActor, ClosureEngine};
pub use memory::InMemoryCaseStore;
pub use transition::{validate_candidate, validate_transition};
