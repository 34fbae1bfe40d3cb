//! # attest-log
//!
//! Append-only, SHA-256 hash-chained event log over a JSON Lines file.
//!
//! ## Overview
//!
//! Every record the writer appends links to its predecessor via `prev_hash`,
//! forming a tamper-evident chain.  Modifying, reordering, or truncating the
//! stored file — even a single byte — is detected by `verify_chain`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use attest_contracts::{EventDraft, EventKind};
//! use attest_log::{read_all, verify_chain, LogWriter};
//!
//! let writer = LogWriter::open(".attest/events.jsonl");
//! writer.append(EventDraft::new(EventKind::PLAN, "ws-1").entry("summary", "initial plan"))?;
//!
//! let records = read_all(writer.path())?;
//! verify_chain(&records)?;
//! ```

pub mod chain;
pub mod reader;
pub mod writer;

pub use chain::{record_hash, verify_chain};
pub use reader::{read_all, read_tolerant, Scan, SkippedLine};
pub use writer::LogWriter;

// ── Tests ─────────────────────────────────────────────────────────────────────
