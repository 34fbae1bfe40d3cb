//! Composable, pure filters over an in-memory record sequence.
//!
//! Every function takes a slice, returns a fresh `Vec`, and preserves the
//! input order, so filters chain in any combination.  The string-matching
//! filters treat an empty argument as the identity filter — callers can
//! apply them unconditionally instead of branching on optional CLI flags.

use chrono::{DateTime, Utc};

use attest_contracts::EventRecord;

/// Payload fields searched by `by_search` — the free-text fields the two
/// historical logs put human-readable prose in.
pub const SEARCH_FIELDS: &[&str] = &[
    "question",
    "decision",
    "rationale",
    "summary",
    "lesson",
    "notes",
];

/// Keep records whose kind equals `kind`. Empty `kind` is a no-op.
pub fn by_kind(records: &[EventRecord], kind: &str) -> Vec<EventRecord> {
    if kind.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| r.kind.as_str() == kind)
        .cloned()
        .collect()
}

/// Keep records about `subject_id`. Empty argument is a no-op.
pub fn by_subject(records: &[EventRecord], subject_id: &str) -> Vec<EventRecord> {
    if subject_id.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| r.subject_id == subject_id)
        .cloned()
        .collect()
}

/// Keep records emitted by `actor_id`. Empty argument is a no-op.
pub fn by_actor(records: &[EventRecord], actor_id: &str) -> Vec<EventRecord> {
    if actor_id.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| r.actor_id.as_deref() == Some(actor_id))
        .cloned()
        .collect()
}

/// Keep records whose payload `model` equals `model`. Empty argument is a
/// no-op.
pub fn by_model(records: &[EventRecord], model: &str) -> Vec<EventRecord> {
    if model.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| r.data_str("model") == Some(model))
        .cloned()
        .collect()
}

/// Keep records whose payload `commit` starts with `sha`, so short SHAs
/// trace correctly. Empty argument is a no-op.
pub fn by_commit(records: &[EventRecord], sha: &str) -> Vec<EventRecord> {
    if sha.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| r.data_str("commit").is_some_and(|c| c.starts_with(sha)))
        .cloned()
        .collect()
}

/// Keep records with `text` as a case-insensitive substring of any
/// designated free-text payload field. Empty `text` is a no-op.
pub fn by_search(records: &[EventRecord], text: &str) -> Vec<EventRecord> {
    if text.is_empty() {
        return records.to_vec();
    }
    let needle = text.to_lowercase();
    records
        .iter()
        .filter(|r| {
            SEARCH_FIELDS
                .iter()
                .filter_map(|field| r.data_str(field))
                .any(|value| value.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Keep records with `ts >= since`.
pub fn since(records: &[EventRecord], since: DateTime<Utc>) -> Vec<EventRecord> {
    records.iter().filter(|r| r.ts >= since).cloned().collect()
}

/// Keep only the final `n` records, in order. `n >= len` is a no-op.
pub fn last_n(records: &[EventRecord], n: usize) -> Vec<EventRecord> {
    let skip = records.len().saturating_sub(n);
    records[skip..].to_vec()
}

/// 1-indexed pagination: `(page slice, total count)`.
///
/// A page beyond the end returns an empty slice plus the true total, so the
/// caller can clamp and retry page 1.  Page 0 is clamped to 1; a page size
/// of 0 yields an empty page.
pub fn page(
    records: &[EventRecord],
    page_number: usize,
    page_size: usize,
) -> (Vec<EventRecord>, usize) {
    let total = records.len();
    if page_size == 0 {
        return (Vec::new(), total);
    }
    let start = (page_number.max(1) - 1).saturating_mul(page_size);
    if start >= total {
        return (Vec::new(), total);
    }
    let end = (start + page_size).min(total);
    (records[start..end].to_vec(), total)
}
