//! Error types for the attest event log.
//!
//! All fallible operations return `LogResult<T>`.  Variants carry enough
//! context to tell an operator which file, line, or record failed.  Integrity
//! and append failures are never silently retried — a broken chain is
//! evidence, not a cache.

use thiserror::Error;

/// The unified error type for the attest crates.
#[derive(Debug, Error)]
pub enum LogError {
    /// The backing store could not be appended to (permission, disk full,
    /// invalid path).  Fatal to synchronous callers; detached emission
    /// downgrades this to a logged warning.
    #[error("append failed: {reason}")]
    Append { reason: String },

    /// The backing store could not be read.
    #[error("failed to read log '{path}': {reason}")]
    Read { path: String, reason: String },

    /// A stored line failed to deserialize (strict read policy).
    #[error("malformed record at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// A record or sequence could not be rendered to the requested export
    /// format.
    #[error("export serialization failed: {reason}")]
    Serialize { reason: String },

    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// The integrity check failed.  Never auto-repaired.
    #[error(transparent)]
    Chain(#[from] ChainBreak),
}

/// Convenience alias used throughout the attest crates.
pub type LogResult<T> = Result<T, LogError>;

/// Which of the two chain rules a record violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    /// `prev_hash` does not equal the predecessor's stored `hash`.
    Link,
    /// The stored `hash` does not match the value recomputed from the
    /// record's own content.
    Content,
}

impl std::fmt::Display for BreakKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakKind::Link => f.write_str("prev-hash link"),
            BreakKind::Content => f.write_str("record hash"),
        }
    }
}

/// The first point at which a chain failed verification.
///
/// For `BreakKind::Link`, `expected` is the predecessor's stored hash and
/// `actual` is the record's stored `prev_hash`.  For `BreakKind::Content`,
/// `expected` is the record's stored `hash` and `actual` is the recomputed
/// digest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("chain break at record {index}: {kind} mismatch (expected {expected}, actual {actual})")]
pub struct ChainBreak {
    /// Zero-based index of the first inconsistent record.
    pub index: usize,
    /// The digest the chain rules require at this position.
    pub expected: String,
    /// The digest actually found.
    pub actual: String,
    /// Which rule failed.
    pub kind: BreakKind,
}
