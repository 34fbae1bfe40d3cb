//! # attest-trails
//!
//! The two historical event logs — "workflow evidence" and "agent
//! coordination" — rebuilt as thin typed facades over one generic
//! hash-chained core.  Both serialize to the same record shape and can even
//! share one backing file; only the event vocabulary and payload
//! conventions differ.

pub mod coordination;
pub mod evidence;

pub use coordination::CoordinationLog;
pub use evidence::{DecisionEntry, EvidenceLog};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use attest_contracts::EventKind;
    use attest_log::{verify_chain, LogWriter};

    use super::{CoordinationLog, DecisionEntry, EvidenceLog};

    /// Plan, verification, and approval for one workstream land in append
    /// order and chain cleanly.
    #[test]
    fn test_evidence_trail_records_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let trail = EvidenceLog::open(dir.path().join("evidence.jsonl"));

        trail
            .record_plan(
                "ws-1",
                &["src/writer.rs".to_string(), "src/reader.rs".to_string()],
                "split reader out of writer",
            )
            .unwrap();
        trail
            .record_verification("ws-1", true, Some("212 tests, 0 failures"))
            .unwrap();
        trail
            .record_approval("ws-1", "main", "abc1234", "alice")
            .unwrap();

        let history = trail.history().unwrap();
        assert_eq!(history.len(), 3);
        verify_chain(&history).unwrap();

        assert_eq!(history[0].kind.as_str(), EventKind::PLAN);
        assert_eq!(history[1].data_bool("passed"), Some(true));
        assert_eq!(history[2].data_str("approver"), Some("alice"));
        assert!(history.iter().all(|r| r.subject_id == "ws-1"));
        assert!(history.iter().all(|r| r.actor_id.is_none()));
    }

    /// Decision payloads carry the full question/decision context.
    #[test]
    fn test_decision_entry_payload() {
        let dir = tempfile::tempdir().unwrap();
        let trail = EvidenceLog::open(dir.path().join("evidence.jsonl"));

        let record = trail
            .record_decision(
                "ws-db",
                DecisionEntry::new("Use SQLite or Postgres?", "SQLite")
                    .rationale("single-file deploy")
                    .alternatives(vec!["Postgres".to_string()])
                    .tags(vec!["storage".to_string()])
                    .outcome("failure")
                    .reverses("rec-0042"),
            )
            .unwrap();

        assert_eq!(record.data_str("question"), Some("Use SQLite or Postgres?"));
        assert_eq!(record.data_str("outcome"), Some("failure"));
        assert_eq!(record.data_str("reverses"), Some("rec-0042"));
        assert_eq!(record.data["alternatives"][0], "Postgres");
    }

    /// Coordination events carry actor identity and role; the detached
    /// action path eventually lands in the same chain.
    #[test]
    fn test_coordination_trail_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let trail = CoordinationLog::open(dir.path().join("coordination.jsonl"));

        trail
            .agent_started("task-9", "agent-7", "builder", "claimed task")
            .unwrap();
        trail.agent_action("task-9", "agent-7", "builder", "edit", "rewrote writer.rs");

        // The detached action races the assertions; wait for it to land.
        let deadline = Instant::now() + Duration::from_secs(5);
        while trail.history().unwrap().len() < 2 {
            assert!(Instant::now() < deadline, "detached action never landed");
            std::thread::sleep(Duration::from_millis(10));
        }

        trail
            .agent_completed("task-9", "agent-7", "builder", "task done")
            .unwrap();

        let history = trail.history().unwrap();
        assert_eq!(history.len(), 3);
        verify_chain(&history).unwrap();
        assert!(history
            .iter()
            .all(|r| r.actor_id.as_deref() == Some("agent-7")));
        assert!(history.iter().all(|r| r.role.as_deref() == Some("builder")));
    }

    /// Both facades can share one writer and one chain.
    #[test]
    fn test_trails_share_one_chain() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LogWriter::open(dir.path().join("events.jsonl"));

        let evidence = EvidenceLog::from_writer(writer.clone());
        let coordination = CoordinationLog::from_writer(writer);

        evidence
            .record_verification("ws-1", false, Some("2 failures"))
            .unwrap();
        coordination
            .agent_failed("ws-1", "agent-7", "verifier", "tests failed")
            .unwrap();

        let history = evidence.history().unwrap();
        assert_eq!(history.len(), 2);
        verify_chain(&history).unwrap();
        assert_eq!(history[1].kind.as_str(), EventKind::AGENT_ERROR);
    }
}
