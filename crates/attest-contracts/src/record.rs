//! Event record and draft types.
//!
//! `EventRecord` is one immutable line of the append-only log — what callers
//! hand to the writer, wrapped with the SHA-256 hashes that make tampering
//! detectable.  `EventDraft` is the caller-constructed candidate before the
//! writer assigns `prev_hash` and `hash`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open event-type vocabulary.
///
/// The well-known kinds below cover the workflow-evidence events (`plan`
/// through `lesson`) and the agent-coordination events (`agent-*`).  Any
/// other string passes through untouched — downstream tooling treats the
/// vocabulary as open, so new event kinds never require a schema change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventKind(pub String);

impl EventKind {
    /// A planning event. Conventional `data` keys: `files` (scope list),
    /// `summary`.
    pub const PLAN: &'static str = "plan";

    /// A code-generation event. Conventional keys: `model`, `summary`.
    pub const GENERATION: &'static str = "generation";

    /// A verification event. Conventional keys: `passed` (bool), `output`.
    pub const VERIFICATION: &'static str = "verification";

    /// An approval event. Conventional keys: `branch`, `commit`, `approver`.
    pub const APPROVAL: &'static str = "approval";

    /// A human decision. Conventional keys: `question`, `decision`,
    /// `rationale`, `alternatives`, `tags`, `outcome`, and optionally
    /// `reverses` (the id of a prior decision this one reverses).
    pub const DECISION: &'static str = "decision";

    /// A post-hoc lesson. Conventional key: `lesson`.
    pub const LESSON: &'static str = "lesson";

    /// An agent came online. Conventional key: `detail`.
    pub const AGENT_START: &'static str = "agent-start";

    /// An agent performed an action. Conventional keys: `action`, `detail`.
    pub const AGENT_ACTION: &'static str = "agent-action";

    /// An agent finished its unit of work. Conventional key: `detail`.
    pub const AGENT_COMPLETE: &'static str = "agent-complete";

    /// An agent failed. Conventional key: `error`.
    pub const AGENT_ERROR: &'static str = "agent-error";

    /// Wrap an arbitrary kind string.
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    /// The kind as a plain string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventKind {
    fn from(kind: &str) -> Self {
        Self(kind.to_string())
    }
}

/// One immutable, hash-chained entry in the event log.
///
/// Serialized as a single JSON object per line.  `kind` appears on the wire
/// under the key `"type"`; `actor_id` and `role` are omitted entirely when
/// absent (the workflow-evidence events never set them).  `data` is a
/// sorted-key map so the canonical encoding — and therefore the hash — is
/// deterministic across write and verify.
///
/// Modifying any field after append invalidates `hash` and every subsequent
/// record's `prev_hash`, which `verify_chain` detects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique identifier for this record.
    pub id: String,

    /// The event kind (open vocabulary).
    #[serde(rename = "type")]
    pub kind: EventKind,

    /// Wall-clock emission time (UTC, RFC 3339 on the wire).
    pub ts: DateTime<Utc>,

    /// Correlator shared by all records about the same unit of work.
    pub subject_id: String,

    /// Identity of the emitting agent/process (coordination events only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,

    /// Functional role of the emitting agent (coordination events only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Event-kind-specific payload. Keys follow documented conventions per
    /// kind but are not schema-enforced.
    #[serde(default)]
    pub data: Map<String, Value>,

    /// Hash of the immediately preceding record; empty only for the first
    /// record in a file.
    pub prev_hash: String,

    /// SHA-256 hex digest over every field above, computed at append time.
    pub hash: String,
}

impl EventRecord {
    /// Look up a string-valued payload field.
    ///
    /// Returns `None` when the key is absent or holds a non-string value.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Look up a bool-valued payload field.
    pub fn data_bool(&self, key: &str) -> Option<bool> {
        self.data.get(key).and_then(Value::as_bool)
    }
}

/// A record candidate, before the writer assigns `prev_hash` and `hash`.
///
/// `new()` defaults `id` to a fresh UUID and `ts` to now; builder methods
/// fill in the rest.
///
/// ```rust,ignore
/// let draft = EventDraft::new(EventKind::VERIFICATION, "ws-1")
///     .entry("passed", true)
///     .entry("output", "112 tests, 0 failures");
/// let record = writer.append(draft)?;
/// ```
#[derive(Debug, Clone)]
pub struct EventDraft {
    /// Record identifier; defaults to a fresh UUID v4.
    pub id: String,
    /// The event kind.
    pub kind: EventKind,
    /// Emission time; defaults to now.
    pub ts: DateTime<Utc>,
    /// Unit-of-work correlator.
    pub subject_id: String,
    /// Emitting agent identity, if any.
    pub actor_id: Option<String>,
    /// Emitting agent role, if any.
    pub role: Option<String>,
    /// Event payload.
    pub data: Map<String, Value>,
}

impl EventDraft {
    /// Start a draft of `kind` correlated to `subject_id`.
    pub fn new(kind: impl Into<EventKind>, subject_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: kind.into(),
            ts: Utc::now(),
            subject_id: subject_id.into(),
            actor_id: None,
            role: None,
            data: Map::new(),
        }
    }

    /// Override the generated record id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Override the emission timestamp.
    pub fn at(mut self, ts: DateTime<Utc>) -> Self {
        self.ts = ts;
        self
    }

    /// Set the emitting agent's identity.
    pub fn actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    /// Set the emitting agent's role.
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Insert one payload entry.
    pub fn entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Replace the whole payload map.
    pub fn payload(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Finish the draft into a record with the given chain position.
    ///
    /// Used by the writer; `hash` is expected to have been computed over the
    /// resulting record's content with `prev_hash` already in place.
    pub fn into_record(self, prev_hash: String, hash: String) -> EventRecord {
        EventRecord {
            id: self.id,
            kind: self.kind,
            ts: self.ts,
            subject_id: self.subject_id,
            actor_id: self.actor_id,
            role: self.role,
            data: self.data,
            prev_hash,
            hash,
        }
    }
}
