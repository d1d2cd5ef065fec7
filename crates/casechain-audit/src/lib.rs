//! # casechain-audit
//!
//! SHA-256 hash-chain primitives for casechain closure events.
//!
//! ## Overview
//!
//! Every closure event commits to the chain head before it via `prev_hash`.
//! `hash_event` computes that commitment; `verify_chain` and `verify_case`
//! walk a history and report the first event where linkage, digest, time
//! order, or lifecycle replay breaks.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use casechain_audit::verify_case;
//!
//! let report = verify_case(&case_file)?;
//! println!("{} events, head {}", report.event_count, report.head);
//! ```

pub mod chain;

pub use chain::{canonical_timestamp, hash_event, verify_case, verify_chain, ChainReport, HASH_DOMAIN};

// ── Tests ─────────────────────────────────────────────────────────────────────
