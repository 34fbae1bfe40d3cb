//! Aggregate statistics over a record sequence.

use std::collections::BTreeMap;

use attest_contracts::EventRecord;

/// Counts computed in one pass over the sequence.
///
/// Maps are sorted by key so rendered reports are stable.  `by_model` counts
/// only records whose payload carries a `model` key; `by_actor` and
/// `by_role` count only records that set those identity fields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogStats {
    /// Total number of records seen.
    pub total: usize,
    /// Count per event kind.
    pub by_kind: BTreeMap<String, usize>,
    /// Count per payload `model` value.
    pub by_model: BTreeMap<String, usize>,
    /// Count per UTC calendar date of emission.
    pub by_date: BTreeMap<String, usize>,
    /// Count per emitting actor.
    pub by_actor: BTreeMap<String, usize>,
    /// Count per emitting role.
    pub by_role: BTreeMap<String, usize>,
}

/// Compute `LogStats` for the sequence. Single O(n) pass, no external state.
pub fn aggregate(records: &[EventRecord]) -> LogStats {
    let mut stats = LogStats {
        total: records.len(),
        ..LogStats::default()
    };

    for record in records {
        *stats
            .by_kind
            .entry(record.kind.as_str().to_string())
            .or_default() += 1;
        *stats
            .by_date
            .entry(record.ts.date_naive().to_string())
            .or_default() += 1;

        if let Some(model) = record.data_str("model") {
            *stats.by_model.entry(model.to_string()).or_default() += 1;
        }
        if let Some(actor) = &record.actor_id {
            *stats.by_actor.entry(actor.clone()).or_default() += 1;
        }
        if let Some(role) = &record.role {
            *stats.by_role.entry(role.clone()).or_default() += 1;
        }
    }

    stats
}
