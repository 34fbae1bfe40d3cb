//! The workflow-evidence trail: typed emitters for lifecycle events.
//!
//! `EvidenceLog` wraps one `LogWriter` and turns the documented payload
//! conventions for `plan`, `generation`, `verification`, `approval`,
//! `decision`, and `lesson` events into method signatures, so call sites
//! cannot misspell a payload key.  Everything chains through the same
//! generic hash-chained core as the coordination trail.

use std::path::{Path, PathBuf};

use serde_json::json;

use attest_contracts::{EventDraft, EventKind, EventRecord, LogResult};
use attest_log::{read_all, LogWriter};

/// A human decision, recorded with enough context to be revisited later.
#[derive(Debug, Clone)]
pub struct DecisionEntry {
    /// The question that was on the table.
    pub question: String,
    /// What was decided.
    pub decision: String,
    /// Why.
    pub rationale: String,
    /// Options that were considered and rejected.
    pub alternatives: Vec<String>,
    /// Free-form tags for later similarity lookup.
    pub tags: Vec<String>,
    /// How the decision worked out ("success"/"failure"), when known.
    pub outcome: Option<String>,
    /// Id of a prior decision record this one reverses, if any.
    pub reverses: Option<String>,
}

impl DecisionEntry {
    /// A decision with empty rationale, alternatives, and tags.
    pub fn new(question: impl Into<String>, decision: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            decision: decision.into(),
            rationale: String::new(),
            alternatives: Vec::new(),
            tags: Vec::new(),
            outcome: None,
            reverses: None,
        }
    }

    pub fn rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = rationale.into();
        self
    }

    pub fn alternatives(mut self, alternatives: Vec<String>) -> Self {
        self.alternatives = alternatives;
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Record how the decision worked out.
    pub fn outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }

    /// Mark this decision as reversing the decision record `id`.
    pub fn reverses(mut self, id: impl Into<String>) -> Self {
        self.reverses = Some(id.into());
        self
    }
}

/// Typed facade over the hash-chained log for workflow-evidence events.
#[derive(Clone)]
pub struct EvidenceLog {
    writer: LogWriter,
}

impl EvidenceLog {
    /// Open the evidence trail at `path`.
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

    /// Record a planning event with its file scope.
    pub fn record_plan(
        &self,
        subject_id: &str,
        files: &[String],
        summary: &str,
    ) -> LogResult<EventRecord> {
        self.writer.append(
            EventDraft::new(EventKind::PLAN, subject_id)
                .entry("files", json!(files))
                .entry("summary", summary),
        )
    }

    /// Record a code-generation event.
    pub fn record_generation(
        &self,
        subject_id: &str,
        model: &str,
        summary: &str,
    ) -> LogResult<EventRecord> {
        self.writer.append(
            EventDraft::new(EventKind::GENERATION, subject_id)
                .entry("model", model)
                .entry("summary", summary),
        )
    }

    /// Record a verification run and its verdict.
    pub fn record_verification(
        &self,
        subject_id: &str,
        passed: bool,
        output: Option<&str>,
    ) -> LogResult<EventRecord> {
        let mut draft =
            EventDraft::new(EventKind::VERIFICATION, subject_id).entry("passed", passed);
        if let Some(output) = output {
            draft = draft.entry("output", output);
        }
        self.writer.append(draft)
    }

    /// Record an approval.
    ///
    /// Always synchronous: the caller's own success/failure reporting must
    /// reflect whether the approval was durably recorded.
    pub fn record_approval(
        &self,
        subject_id: &str,
        branch: &str,
        commit: &str,
        approver: &str,
    ) -> LogResult<EventRecord> {
        self.writer.append(
            EventDraft::new(EventKind::APPROVAL, subject_id)
                .entry("branch", branch)
                .entry("commit", commit)
                .entry("approver", approver),
        )
    }

    /// Record a human decision.
    pub fn record_decision(
        &self,
        subject_id: &str,
        entry: DecisionEntry,
    ) -> LogResult<EventRecord> {
        let mut draft = EventDraft::new(EventKind::DECISION, subject_id)
            .entry("question", entry.question)
            .entry("decision", entry.decision)
            .entry("rationale", entry.rationale)
            .entry("alternatives", json!(entry.alternatives))
            .entry("tags", json!(entry.tags));
        if let Some(outcome) = entry.outcome {
            draft = draft.entry("outcome", outcome);
        }
        if let Some(reverses) = entry.reverses {
            draft = draft.entry("reverses", reverses);
        }
        self.writer.append(draft)
    }

    /// Record a lesson, blocking until durable.
    pub fn record_lesson(&self, subject_id: &str, lesson: &str) -> LogResult<EventRecord> {
        self.writer
            .append(EventDraft::new(EventKind::LESSON, subject_id).entry("lesson", lesson))
    }

    /// Record a lesson best-effort on a background thread.
    ///
    /// Returns immediately; a write failure only produces a logged warning.
    pub fn note_lesson(&self, subject_id: &str, lesson: &str) {
        self.writer
            .append_detached(EventDraft::new(EventKind::LESSON, subject_id).entry("lesson", lesson));
    }
}
