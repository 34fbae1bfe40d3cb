//! # attest-query
//!
//! Pure filter/query combinators, report rendering, and aggregate
//! statistics over an in-memory record sequence produced by `attest-log`.
//!
//! Nothing here touches the filesystem or mutates its input: every filter
//! returns a fresh, order-preserving `Vec`, so combinators chain in any
//! order.

pub mod filter;
pub mod format;
pub mod stats;

pub use filter::{
    by_actor, by_commit, by_kind, by_model, by_search, by_subject, last_n, page, since,
};
pub use format::{render_csv, render_human, render_json, summary_line};
pub use stats::{aggregate, LogStats};

// ── Tests ─────────────────────────────────────────────────────────────────────
