//! Hash-chain primitives: record hashing and chain integrity verification.
//!
//! Every field that contributes to a record's hash is listed explicitly so
//! nothing is accidentally omitted.  The preimage is the canonical JSON
//! encoding of the record minus its `hash` field:
//!
//! Preimage layout (JSON object, fixed key order):
//!   1. id
//!   2. type (the event kind)
//!   3. ts (RFC 3339, UTC)
//!   4. subject_id
//!   5. actor_id / role (omitted entirely when absent, matching the wire form)
//!   6. data (sorted-key map)
//!   7. prev_hash
//!
//! `serde_json::to_vec` over this structure is deterministic: struct fields
//! serialize in declaration order and `data` keys are sorted, so the same
//! record always yields the same digest across write and verify.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use attest_contracts::{BreakKind, ChainBreak, EventKind, EventRecord};

/// The canonical hash preimage — every record field except `hash` itself.
#[derive(Serialize)]
struct Preimage<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'a EventKind,
    ts: &'a DateTime<Utc>,
    subject_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    actor_id: Option<&'a String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a String>,
    data: &'a Map<String, Value>,
    prev_hash: &'a str,
}

/// Compute the SHA-256 hash for a single record.
///
/// The digest commits to the record's full content and to its link to the
/// previous record (`prev_hash`), so flipping any byte anywhere — including
/// inside the `data` payload — changes the result.  The stored `hash` field
/// is ignored.
///
/// Returns a lowercase 64-character hex string.
///
/// # Panics
///
/// Panics if the record cannot be serialized to JSON — which cannot happen
/// for the well-formed `EventRecord` type.
pub fn record_hash(record: &EventRecord) -> String {
    let preimage = Preimage {
        id: &record.id,
        kind: &record.kind,
        ts: &record.ts,
        subject_id: &record.subject_id,
        actor_id: record.actor_id.as_ref(),
        role: record.role.as_ref(),
        data: &record.data,
        prev_hash: &record.prev_hash,
    };

    let bytes =
        serde_json::to_vec(&preimage).expect("EventRecord must always be serializable to JSON");

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    hex::encode(hasher.finalize())
}

/// Verify the integrity of a hash chain.
///
/// Two rules are checked for every record, fail-fast at the first break:
///
/// 1. **Prev-hash linkage** — the record's `prev_hash` equals the `hash` of
///    the preceding record, or the empty string for the first record.
/// 2. **Hash correctness** — the record's stored `hash` matches the value
///    recomputed from its own content.
///
/// An empty sequence is trivially valid.  No repair is attempted — the only
/// remedial action for a break is human investigation.
pub fn verify_chain(records: &[EventRecord]) -> Result<(), ChainBreak> {
    let mut expected_prev = String::new();

    for (index, record) in records.iter().enumerate() {
        if record.prev_hash != expected_prev {
            return Err(ChainBreak {
                index,
                expected: expected_prev,
                actual: record.prev_hash.clone(),
                kind: BreakKind::Link,
            });
        }

        let recomputed = record_hash(record);
        if record.hash != recomputed {
            return Err(ChainBreak {
                index,
                expected: record.hash.clone(),
                actual: recomputed,
                kind: BreakKind::Content,
            });
        }

        expected_prev.clone_from(&record.hash);
    }

    Ok(())
}
