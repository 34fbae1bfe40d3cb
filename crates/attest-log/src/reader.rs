//! Loading the ordered record sequence from a log file.
//!
//! One record per line, in file order — the canonical chain order.  A
//! missing file is an empty sequence, not an error, so tooling can run
//! before any event has ever been recorded.
//!
//! Two read policies:
//!
//! - `read_all` is strict: the first unparsable line aborts the read.
//! - `read_tolerant` skips malformed lines but reports every skip, so
//!   lenient consumers (metrics classification and the like) never lose
//!   data silently.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use tracing::warn;

use attest_contracts::{EventRecord, LogError, LogResult};

/// The result of a tolerant read: the records that parsed, plus an account
/// of every line that did not.
#[derive(Debug)]
pub struct Scan {
    /// Successfully parsed records, in file order.
    pub records: Vec<EventRecord>,
    /// Lines that failed to parse and were skipped.
    pub skipped: Vec<SkippedLine>,
}

/// One line skipped by a tolerant read.
#[derive(Debug, Clone)]
pub struct SkippedLine {
    /// 1-based line number in the backing file.
    pub line: usize,
    /// The deserialization failure message.
    pub reason: String,
}

/// Read the full ordered sequence of records, strictly.
///
/// Returns `LogError::Parse` (with the 1-based line number) for the first
/// line that fails to deserialize.  Blank lines are ignored.  A nonexistent
/// file yields an empty sequence.
pub fn read_all(path: &Path) -> LogResult<Vec<EventRecord>> {
    let mut records = Vec::new();
    for_each_line(path, |line_no, text| {
        let record: EventRecord =
            serde_json::from_str(text).map_err(|e| LogError::Parse {
                line: line_no,
                reason: e.to_string(),
            })?;
        records.push(record);
        Ok(())
    })?;
    Ok(records)
}

/// Read the full sequence leniently, skipping malformed lines.
///
/// Every skipped line is recorded in `Scan::skipped` and logged as a
/// warning — the data loss is observable, never silent.
pub fn read_tolerant(path: &Path) -> LogResult<Scan> {
    let mut scan = Scan {
        records: Vec::new(),
        skipped: Vec::new(),
    };
    for_each_line(path, |line_no, text| {
        match serde_json::from_str::<EventRecord>(text) {
            Ok(record) => scan.records.push(record),
            Err(e) => {
                warn!(path = %path.display(), line = line_no, error = %e, "skipping malformed record");
                scan.skipped.push(SkippedLine {
                    line: line_no,
                    reason: e.to_string(),
                });
            }
        }
        Ok(())
    })?;
    Ok(scan)
}

/// Drive `f` over every non-blank line of the file, with 1-based numbering.
fn for_each_line(
    path: &Path,
    mut f: impl FnMut(usize, &str) -> LogResult<()>,
) -> LogResult<()> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(LogError::Read {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        }
    };

    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| LogError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if line.trim().is_empty() {
            continue;
        }
        f(idx + 1, &line)?;
    }

    Ok(())
}
