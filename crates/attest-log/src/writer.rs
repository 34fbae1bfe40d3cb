//! File-backed writer: serialized, durable appends to the hash chain.
//!
//! `LogWriter` is an explicit, cloneable handle — there is no process-wide
//! default writer.  Clones share one append lock, so concurrent callers in
//! one process cannot interleave the read-tail / hash / append sequence.
//! Across processes, an exclusive advisory file lock is held for the
//! duration of each append, and the chain tail is re-read from the file
//! under that lock, so independent handles on the same path chain correctly.
//!
//! Two emission modes:
//!
//! - `append()` blocks until the record is durably on disk and returns the
//!   persisted record (or the error).
//! - `append_detached()` hands the draft to a background thread and returns
//!   immediately; failures are only logged.  A process that emits detached
//!   and exits straight away may lose the event — an accepted trade-off for
//!   best-effort telemetry-style events.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use fs2::FileExt;
use tracing::{debug, warn};

use attest_contracts::{EventDraft, EventRecord, LogError, LogResult};

use crate::chain::record_hash;

/// Append handle for one hash-chained log file.
///
/// Cheap to clone; all clones serialize their appends through the same lock.
/// No I/O happens until the first append — the file and its parent directory
/// are created on demand.
#[derive(Clone)]
pub struct LogWriter {
    path: PathBuf,
    append_lock: Arc<Mutex<()>>,
}

impl LogWriter {
    /// Create a handle for the log at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The backing file this writer appends to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record synchronously, blocking until it is durable.
    ///
    /// Acquires the process-local append lock, then an exclusive advisory
    /// lock on the log file, reads the current tail hash, computes the new
    /// record's hash, writes the record as a single JSON line, and fsyncs
    /// before returning it.
    pub fn append(&self, draft: EventDraft) -> LogResult<EventRecord> {
        let _guard = self.append_lock.lock().map_err(|e| LogError::Append {
            reason: format!("append lock poisoned: {}", e),
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| LogError::Append {
                    reason: format!(
                        "failed to create log directory '{}': {}",
                        parent.display(),
                        e
                    ),
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(&self.path)
            .map_err(|e| LogError::Append {
                reason: format!("failed to open log '{}': {}", self.path.display(), e),
            })?;

        file.lock_exclusive().map_err(|e| LogError::Append {
            reason: format!("failed to lock log '{}': {}", self.path.display(), e),
        })?;

        let result = self.append_locked(&file, draft);

        if let Err(e) = file.unlock() {
            warn!(path = %self.path.display(), error = %e, "failed to release log lock");
        }

        result
    }

    /// Append one record on a detached background thread.
    ///
    /// Returns immediately.  Failures are logged via `tracing::warn!` and
    /// never surfaced to the caller; there is no ordering or durability
    /// guarantee relative to the caller's subsequent actions.
    pub fn append_detached(&self, draft: EventDraft) {
        let writer = self.clone();
        std::thread::spawn(move || {
            if let Err(e) = writer.append(draft) {
                warn!(
                    path = %writer.path.display(),
                    error = %e,
                    "detached append dropped an event"
                );
            }
        });
    }

    /// The append critical section, entered with both locks held.
    fn append_locked(&self, file: &File, draft: EventDraft) -> LogResult<EventRecord> {
        let prev_hash = self.read_tail_hash(file)?;

        let mut record = draft.into_record(prev_hash, String::new());
        record.hash = record_hash(&record);

        // One write_all for line + newline, so the record lands in a single
        // O_APPEND write.
        let mut line = serde_json::to_string(&record).map_err(|e| LogError::Append {
            reason: format!("failed to serialize record '{}': {}", record.id, e),
        })?;
        line.push('\n');

        let mut out = file;
        out.write_all(line.as_bytes()).map_err(|e| LogError::Append {
            reason: format!("failed to write to log '{}': {}", self.path.display(), e),
        })?;
        file.sync_data().map_err(|e| LogError::Append {
            reason: format!("failed to flush log '{}': {}", self.path.display(), e),
        })?;

        debug!(
            id = %record.id,
            kind = %record.kind,
            subject_id = %record.subject_id,
            hash = %record.hash,
            "event appended"
        );

        Ok(record)
    }

    /// Read the hash of the last record in the file, or an empty string for
    /// a fresh/empty log.
    ///
    /// A malformed final line fails the append: the chain tail cannot be
    /// established, and appending anyway would silently fork the chain.
    fn read_tail_hash(&self, file: &File) -> LogResult<String> {
        let handle = file.try_clone().map_err(|e| LogError::Append {
            reason: format!("failed to reopen log '{}': {}", self.path.display(), e),
        })?;

        let mut last: Option<(usize, String)> = None;
        for (idx, line) in BufReader::new(handle).lines().enumerate() {
            let line = line.map_err(|e| LogError::Append {
                reason: format!("failed to read log '{}': {}", self.path.display(), e),
            })?;
            if !line.trim().is_empty() {
                last = Some((idx + 1, line));
            }
        }

        match last {
            None => Ok(String::new()),
            Some((line_no, text)) => {
                let tail: EventRecord = serde_json::from_str(&text).map_err(|e| {
                    LogError::Append {
                        reason: format!(
                            "cannot establish chain tail: line {} of '{}' is malformed: {}",
                            line_no,
                            self.path.display(),
                            e
                        ),
                    }
                })?;
                Ok(tail.hash)
            }
        }
    }
}
