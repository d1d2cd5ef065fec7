//! # casechain-contracts
//!
//! Shared types, wire forms, and the error taxonomy for the casechain
//! closure audit chain.
//!
//! Every crate in the workspace imports from here. No chain logic lives in
//! this crate, only data definitions, their serialized shape, and errors.

pub mod authority;
pub mod case;
pub mod error;
pub mod event;
pub mod state;

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use authority::{AuthorityBinding, AuthorityRequest, AuthorityResponse};
    use case::CaseFile;
    use error::ClosureError;
    use event::CandidateEvent;
    use state::{ClosureEventType, ClosureState};

    // ── States and event types ───────────────────────────────────────────────

    #[test]
    fn states_serialize_as_upper_case_names() {
        assert_eq!(serde_json::to_value(ClosureState::Open).unwrap(), json!("OPEN"));
        assert_eq!(
            serde_json::to_value(ClosureState::Acknowledged).unwrap(),
            json!("ACKNOWLEDGED")
        );
        assert_eq!(
            serde_json::to_value(ClosureEventType::Acknowledge).unwrap(),
            json!("ACKNOWLEDGE")
        );

        let decoded: ClosureState = serde_json::from_value(json!("CLOSED")).unwrap();
        assert_eq!(decoded, ClosureState::Closed);
    }

    #[test]
    fn unknown_state_name_is_rejected() {
        let result: Result<ClosureState, _> = serde_json::from_value(json!("REOPENED"));
        assert!(result.is_err());
    }

    #[test]
    fn only_closed_is_terminal() {
        assert!(ClosureState::Closed.is_terminal());
        assert!(!ClosureState::Open.is_terminal());
        assert!(!ClosureState::Escalated.is_terminal());
        assert!(!ClosureState::Acknowledged.is_terminal());
    }

    #[test]
    fn each_event_type_has_one_target_state() {
        assert_eq!(ClosureEventType::Escalate.target_state(), ClosureState::Escalated);
        assert_eq!(ClosureEventType::Acknowledge.target_state(), ClosureState::Acknowledged);
        assert_eq!(ClosureEventType::Close.target_state(), ClosureState::Closed);
    }

    #[test]
    fn transition_table_is_linear() {
        assert_eq!(
            ClosureState::Open.next(ClosureEventType::Escalate),
            Some(ClosureState::Escalated)
        );
        assert_eq!(
            ClosureState::Escalated.next(ClosureEventType::Acknowledge),
            Some(ClosureState::Acknowledged)
        );
        assert_eq!(
            ClosureState::Acknowledged.next(ClosureEventType::Close),
            Some(ClosureState::Closed)
        );

        // Every other pair is illegal, including anything out of CLOSED.
        assert_eq!(ClosureState::Open.next(ClosureEventType::Acknowledge), None);
        assert_eq!(ClosureState::Open.next(ClosureEventType::Close), None);
        assert_eq!(ClosureState::Escalated.next(ClosureEventType::Escalate), None);
        assert_eq!(ClosureState::Acknowledged.next(ClosureEventType::Escalate), None);
        for event_type in ClosureEventType::ALL {
            assert_eq!(ClosureState::Closed.next(event_type), None);
        }
    }

    // ── CaseFile ─────────────────────────────────────────────────────────────

    #[test]
    fn new_case_is_open_and_empty() {
        let case = CaseFile::open("case-1", "prod", "vault");
        assert_eq!(case.current_state, ClosureState::Open);
        assert!(case.events.is_empty());
        assert!(case.last_hash.is_empty());
        assert!(case.head().is_none());
        assert!(!case.is_closed());
    }

    #[test]
    fn generated_case_ids_are_distinct() {
        let a = CaseFile::open_with_generated_id("prod", "vault");
        let b = CaseFile::open_with_generated_id("prod", "vault");
        assert_ne!(a.case_id, b.case_id);
    }

    #[test]
    fn case_file_uses_documented_field_names() {
        let mut case = CaseFile::open("case-1", "prod", "vault");
        case.assign_owner("alice");

        let value = serde_json::to_value(&case).unwrap();
        for field in ["case_id", "env", "system", "current_state", "owner_id", "events", "last_hash"] {
            assert!(value.get(field).is_some(), "missing field '{field}'");
        }
        // Unset optional identities are omitted rather than written as null.
        assert!(value.get("assignee_id").is_none());
    }

    #[test]
    fn event_type_field_is_named_type() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let event = CandidateEvent::escalate("alice", "IncidentCommander", "risk detected")
            .at(ts)
            .seal(String::new(), "ab".repeat(32));

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], json!("ESCALATE"));
        assert_eq!(value["to_state"], json!("ESCALATED"));
        assert_eq!(value["prev_hash"], json!(""));
    }

    #[test]
    fn malformed_case_json_is_a_serialization_error() {
        let err = CaseFile::from_json(r#"{"case_id": "c", "env": "prod"}"#).unwrap_err();
        assert!(matches!(err, ClosureError::Serialization { .. }));

        let err = CaseFile::from_json("not json").unwrap_err();
        assert!(matches!(err, ClosureError::Serialization { .. }));
    }

    #[test]
    fn case_json_decodes_without_optional_identities() {
        let raw = json!({
            "case_id": "case-9",
            "env": "staging",
            "system": "ledger",
            "current_state": "OPEN",
            "events": [],
            "last_hash": ""
        });
        let case = CaseFile::from_json(&raw.to_string()).unwrap();
        assert_eq!(case.case_id, "case-9");
        assert!(case.owner_id.is_none());
        assert!(case.assignee_id.is_none());
    }

    // ── Candidate events ─────────────────────────────────────────────────────

    #[test]
    fn candidate_constructors_derive_to_state() {
        assert_eq!(CandidateEvent::escalate("a", "r", "x").to_state, ClosureState::Escalated);
        assert_eq!(CandidateEvent::acknowledge("a", "r", "x").to_state, ClosureState::Acknowledged);
        assert_eq!(CandidateEvent::close("a", "r", "x").to_state, ClosureState::Closed);
    }

    #[test]
    fn sealed_event_keeps_candidate_content() {
        let candidate = CandidateEvent::close("alice", "Owner", "resolved");
        let content_before = (
            candidate.actor_id.clone(),
            candidate.reason.clone(),
            candidate.timestamp,
        );
        let event = candidate.seal("prev".to_string(), "this".to_string());

        assert_eq!(event.actor_id, content_before.0);
        assert_eq!(event.reason, content_before.1);
        assert_eq!(event.timestamp, content_before.2);
        assert_eq!(event.prev_hash, "prev");
        assert_eq!(event.hash, "this");
    }

    // ── Authority wire types ─────────────────────────────────────────────────

    #[test]
    fn authority_request_scopes_to_case() {
        let case = CaseFile::open("case-1", "prod", "vault");
        let req = AuthorityRequest::for_case(&case, "bob");
        assert_eq!(req, AuthorityRequest::new("bob", "prod", "vault"));
    }

    #[test]
    fn authority_response_role_lookup() {
        let resp: AuthorityResponse =
            serde_json::from_value(json!({ "user_id": "bob", "roles": ["Approver"] })).unwrap();
        assert!(resp.has_role("Approver"));
        assert!(!resp.has_role("Owner"));
    }

    #[test]
    fn binding_subject_type_field() {
        let binding: AuthorityBinding = serde_json::from_value(json!({
            "subject": { "id": "alice", "type": "user" },
            "scope": { "env": "prod", "system": "vault" },
            "roles": ["Owner"]
        }))
        .unwrap();
        assert_eq!(binding.subject.kind, "user");
        assert_eq!(binding.scope.system, "vault");
    }

    // ── Error display ────────────────────────────────────────────────────────

    #[test]
    fn error_invalid_transition_display() {
        let err = ClosureError::InvalidTransition {
            from: ClosureState::Open,
            event_type: ClosureEventType::Acknowledge,
            to_state: ClosureState::Acknowledged,
        };
        let msg = err.to_string();
        assert!(msg.contains("ACKNOWLEDGE"));
        assert!(msg.contains("from state OPEN"));
    }

    #[test]
    fn error_chain_corrupted_display() {
        let err = ClosureError::ChainCorrupted {
            index: 1,
            reason: "hash mismatch".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("event 1"));
        assert!(msg.contains("hash mismatch"));
    }

    #[test]
    fn error_unauthorized_display() {
        let err = ClosureError::Unauthorized {
            actor_id: "mallory".to_string(),
            actor_role: "Approver".to_string(),
            reason: "role not bound".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("mallory"));
        assert!(msg.contains("Approver"));
        assert!(msg.contains("role not bound"));
    }
}
