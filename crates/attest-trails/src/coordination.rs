//! The agent-coordination trail: lifecycle events for cooperating agents.
//!
//! Every record carries the emitting agent's identity and role.  Start,
//! completion, and failure are recorded synchronously so session tracking
//! reflects durable state; per-step actions are telemetry and go through
//! the detached path so they never block the agent's own work.

use std::path::{Path, PathBuf};

use attest_contracts::{EventDraft, EventKind, EventRecord, LogResult};
use attest_log::{read_all, LogWriter};

/// Typed facade over the hash-chained log for agent-coordination events.
#[derive(Clone)]
pub struct CoordinationLog {
    writer: LogWriter,
}

impl CoordinationLog {
    /// Open the coordination trail at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            writer: LogWriter::open(path),
        }
    }

    /// Wrap an existing writer handle.
    pub fn from_writer(writer: LogWriter) -> Self {
        Self { writer }
    }

    /// The underlying generic writer.
    pub fn writer(&self) -> &LogWriter {
        &self.writer
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        self.writer.path()
    }

    /// Read back the full ordered history of this trail.
    pub fn history(&self) -> LogResult<Vec<EventRecord>> {
        read_all(self.writer.path())
    }

    /// Record that an agent came online for `subject_id`.
    pub fn agent_started(
        &self,
        subject_id: &str,
        actor_id: &str,
        role: &str,
        detail: &str,
    ) -> LogResult<EventRecord> {
        self.writer.append(
            EventDraft::new(EventKind::AGENT_START, subject_id)
                .actor(actor_id)
                .role(role)
                .entry("detail", detail),
        )
    }

    /// Record one agent action, best-effort on a background thread.
    ///
    /// Telemetry-style: returns immediately, failures are only logged, and
    /// an agent that exits right after emitting may lose the event.
    pub fn agent_action(&self, subject_id: &str, actor_id: &str, role: &str, action: &str, detail: &str) {
        self.writer.append_detached(
            EventDraft::new(EventKind::AGENT_ACTION, subject_id)
                .actor(actor_id)
                .role(role)
                .entry("action", action)
                .entry("detail", detail),
        );
    }

    /// Record that an agent finished its unit of work.
    pub fn agent_completed(
        &self,
        subject_id: &str,
        actor_id: &str,
        role: &str,
        detail: &str,
    ) -> LogResult<EventRecord> {
        self.writer.append(
            EventDraft::new(EventKind::AGENT_COMPLETE, subject_id)
                .actor(actor_id)
                .role(role)
                .entry("detail", detail),
        )
    }

    /// Record that an agent failed.
    pub fn agent_failed(
        &self,
        subject_id: &str,
        actor_id: &str,
        role: &str,
        error: &str,
    ) -> LogResult<EventRecord> {
        self.writer.append(
            EventDraft::new(EventKind::AGENT_ERROR, subject_id)
                .actor(actor_id)
                .role(role)
                .entry("error", error),
        )
    }
}
