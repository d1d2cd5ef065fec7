//! Hash-chain primitives: event hashing and chain integrity verification.
//!
//! Every function here is pure.  Nothing logs, nothing mutates, so a chain
//! can be re-verified by anyone holding the case file.
//!
//! Hash input layout (bytes, in order):
//!   1. the domain tag `HASH_DOMAIN`
//!   2. for each of prev_hash, type, actor_id, actor_role, reason, to_state,
//!      timestamp: the field's UTF-8 length as 8-byte little-endian, then
//!      the field's UTF-8 bytes
//!
//! Length prefixes make the encoding injective, so no separator character
//! has to be forbidden inside free-text fields.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use casechain_contracts::{
    case::CaseFile,
    error::{ClosureError, ClosureResult},
    event::{ClosureEvent, EventContent},
    state::ClosureState,
};

/// Prefix mixed into every event digest.
pub const HASH_DOMAIN: &str = "casechain/closure-event/v1";

/// Summary of a chain that passed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainReport {
    pub event_count: usize,
    /// Hash of the last event, or `""` for an empty chain.
    pub head: String,
    /// State reached by replaying every event from `OPEN`.
    pub final_state: ClosureState,
}

/// Render a timestamp the way it is hashed: RFC 3339, UTC, `Z` suffix,
/// always nine fractional digits.
pub fn canonical_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Compute the SHA-256 digest of an event bound to `prev_hash`.
///
/// Returns a lowercase 64-character hex string.
pub fn hash_event(prev_hash: &str, content: &EventContent<'_>) -> String {
    let timestamp = canonical_timestamp(&content.timestamp);

    let mut hasher = Sha256::new();
    hasher.update(HASH_DOMAIN.as_bytes());
    for field in [
        prev_hash,
        content.event_type.as_str(),
        content.actor_id,
        content.actor_role,
        content.reason,
        content.to_state.as_str(),
        timestamp.as_str(),
    ] {
        hasher.update((field.len() as u64).to_le_bytes());
        hasher.update(field.as_bytes());
    }

    hex::encode(hasher.finalize())
}

fn corrupted(index: usize, reason: impl Into<String>) -> ClosureError {
    ClosureError::ChainCorrupted {
        index,
        reason: reason.into(),
    }
}

/// Verify a sequence of events in chain order.
///
/// For each event, in order:
///
/// 1. **Linkage**: `prev_hash` equals the previous event's `hash` (`""` for
///    the first event).
/// 2. **Hash correctness**: `hash` matches the digest recomputed from the
///    event's own fields.
/// 3. **Time order**: `timestamp` is not earlier than the previous event's.
/// 4. **Lifecycle**: the event is a legal transition from the state reached
///    so far, starting at `OPEN`.
///
/// Stops at the first failure and reports its index.  An empty chain is valid.
pub fn verify_chain(events: &[ClosureEvent]) -> ClosureResult<ChainReport> {
    let mut expected_prev = String::new();
    let mut state = ClosureState::Open;
    let mut last_timestamp: Option<DateTime<Utc>> = None;

    for (index, event) in events.iter().enumerate() {
        if event.prev_hash != expected_prev {
            return Err(corrupted(
                index,
                format!(
                    "prev_hash '{}' does not link to chain head '{}'",
                    event.prev_hash, expected_prev
                ),
            ));
        }

        let recomputed = hash_event(&expected_prev, &event.content());
        if event.hash != recomputed {
            return Err(corrupted(
                index,
                format!(
                    "stored hash '{}' does not match recomputed '{}'",
                    event.hash, recomputed
                ),
            ));
        }

        if let Some(previous) = last_timestamp {
            if event.timestamp < previous {
                return Err(corrupted(
                    index,
                    format!(
                        "timestamp {} precedes previous event at {}",
                        canonical_timestamp(&event.timestamp),
                        canonical_timestamp(&previous)
                    ),
                ));
            }
        }

        match state.next(event.event_type) {
            Some(next) if next == event.to_state => state = next,
            _ => {
                return Err(corrupted(
                    index,
                    format!(
                        "{} -> {} is not a legal transition from {}",
                        event.event_type, event.to_state, state
                    ),
                ))
            }
        }

        last_timestamp = Some(event.timestamp);
        expected_prev.clone_from(&event.hash);
    }

    Ok(ChainReport {
        event_count: events.len(),
        head: expected_prev,
        final_state: state,
    })
}

/// Verify a whole case file: its event chain plus the cached head and state.
///
/// Head or state mismatches are reported at index `events.len()`, i.e. just
/// past the last event.  Read-only.
pub fn verify_case(case: &CaseFile) -> ClosureResult<ChainReport> {
    let report = verify_chain(&case.events)?;
    let tail = case.events.len();

    if report.head != case.last_hash {
        return Err(corrupted(
            tail,
            format!(
                "cached last_hash '{}' does not equal chain head '{}'",
                case.last_hash, report.head
            ),
        ));
    }

    if report.final_state != case.current_state {
        return Err(corrupted(
            tail,
            format!(
                "current_state {} does not match replayed state {}",
                case.current_state, report.final_state
            ),
        ));
    }

    Ok(report)
}
