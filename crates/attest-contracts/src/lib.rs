//! # attest-contracts
//!
//! Shared record, draft, and error types for the attest event log.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod error;
pub mod record;

pub use error::{BreakKind, ChainBreak, LogError, LogResult};
pub use record::{EventDraft, EventKind, EventRecord};

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    // ── EventRecord wire shape ───────────────────────────────────────────────

    fn sample_record(actor: bool) -> EventRecord {
        let mut draft = EventDraft::new(EventKind::VERIFICATION, "ws-1")
            .with_id("rec-1")
            .entry("passed", true)
            .entry("output", "112 tests, 0 failures");
        if actor {
            draft = draft.actor("builder-1").role("verifier");
        }
        draft.into_record(String::new(), "deadbeef".to_string())
    }

    #[test]
    fn record_serializes_kind_under_type_key() {
        let json = serde_json::to_value(sample_record(false)).unwrap();
        assert_eq!(json["type"], "verification");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn record_omits_absent_actor_and_role() {
        let json = serde_json::to_value(sample_record(false)).unwrap();
        assert!(json.get("actor_id").is_none());
        assert!(json.get("role").is_none());
    }

    #[test]
    fn record_round_trips_with_actor_and_role() {
        let original = sample_record(true);
        let line = serde_json::to_string(&original).unwrap();
        let decoded: EventRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.actor_id.as_deref(), Some("builder-1"));
        assert_eq!(decoded.role.as_deref(), Some("verifier"));
    }

    #[test]
    fn record_parses_line_without_optional_fields() {
        let line = r#"{"id":"r1","type":"plan","ts":"2026-08-07T12:00:00Z","subject_id":"ws-2","data":{},"prev_hash":"","hash":"aa"}"#;
        let decoded: EventRecord = serde_json::from_str(line).unwrap();
        assert_eq!(decoded.kind.as_str(), EventKind::PLAN);
        assert!(decoded.actor_id.is_none());
        assert!(decoded.data.is_empty());
    }

    // ── Payload accessors ────────────────────────────────────────────────────

    #[test]
    fn data_accessors_distinguish_types() {
        let record = sample_record(false);
        assert_eq!(record.data_bool("passed"), Some(true));
        assert_eq!(record.data_str("output"), Some("112 tests, 0 failures"));

        // Wrong-typed or missing keys return None rather than coercing.
        assert_eq!(record.data_str("passed"), None);
        assert_eq!(record.data_bool("missing"), None);
    }

    // ── EventDraft defaults ──────────────────────────────────────────────────

    #[test]
    fn draft_generates_unique_ids() {
        let ids: std::collections::HashSet<String> = (0..100)
            .map(|_| EventDraft::new(EventKind::PLAN, "ws").id)
            .collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn draft_builder_populates_all_fields() {
        let ts = Utc::now();
        let draft = EventDraft::new("custom-kind", "ws-3")
            .with_id("fixed")
            .at(ts)
            .actor("agent-7")
            .role("planner")
            .entry("note", json!({"nested": 1}));

        assert_eq!(draft.id, "fixed");
        assert_eq!(draft.kind.as_str(), "custom-kind");
        assert_eq!(draft.ts, ts);
        assert_eq!(draft.actor_id.as_deref(), Some("agent-7"));
        assert_eq!(draft.role.as_deref(), Some("planner"));
        assert_eq!(draft.data["note"]["nested"], 1);
    }

    // ── Error display ────────────────────────────────────────────────────────

    #[test]
    fn error_append_display() {
        let err = LogError::Append {
            reason: "disk full".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("append failed"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn error_parse_display_carries_line_number() {
        let err = LogError::Parse {
            line: 17,
            reason: "expected value".to_string(),
        };
        assert!(err.to_string().contains("line 17"));
    }

    #[test]
    fn chain_break_display_names_the_failed_rule() {
        let brk = ChainBreak {
            index: 2,
            expected: "aaaa".to_string(),
            actual: "bbbb".to_string(),
            kind: BreakKind::Content,
        };
        let msg = brk.to_string();
        assert!(msg.contains("record 2"));
        assert!(msg.contains("record hash"));

        // ChainBreak converts into the unified error type.
        let err: LogError = brk.into();
        assert!(err.to_string().contains("chain break"));
    }
}
