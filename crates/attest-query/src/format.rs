//! Rendering a record sequence as a human report, JSON, or CSV.

use attest_contracts::{EventKind, EventRecord, LogError, LogResult};

/// Render one readable block per record.
///
/// Each block carries the kind, timestamp, correlator, the actor identity
/// when present, and a kind-specific summary line derived from the
/// documented payload conventions.
pub fn render_human(records: &[EventRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let header = match (&record.actor_id, &record.role) {
            (Some(actor), Some(role)) => format!(
                "[{}] {:<14} {}  ({}, {})",
                record.ts.to_rfc3339(),
                record.kind,
                record.subject_id,
                actor,
                role
            ),
            (Some(actor), None) => format!(
                "[{}] {:<14} {}  ({})",
                record.ts.to_rfc3339(),
                record.kind,
                record.subject_id,
                actor
            ),
            _ => format!(
                "[{}] {:<14} {}",
                record.ts.to_rfc3339(),
                record.kind,
                record.subject_id
            ),
        };
        out.push_str(&header);
        out.push('\n');
        out.push_str("    ");
        out.push_str(&summary_line(record));
        out.push('\n');
    }
    out
}

/// The kind-specific one-line summary for a record.
pub fn summary_line(record: &EventRecord) -> String {
    let text = |key: &str| record.data_str(key).unwrap_or("").to_string();

    match record.kind.as_str() {
        EventKind::PLAN => {
            let files = record
                .data
                .get("files")
                .and_then(|v| v.as_array())
                .map(|a| a.len())
                .unwrap_or(0);
            format!("plan ({} files in scope): {}", files, text("summary"))
        }
        EventKind::GENERATION => format!("generated [{}]: {}", text("model"), text("summary")),
        EventKind::VERIFICATION => {
            let verdict = match record.data_bool("passed") {
                Some(true) => "passed",
                Some(false) => "FAILED",
                None => "no verdict",
            };
            match record.data_str("output") {
                Some(output) => format!("{}: {}", verdict, output),
                None => verdict.to_string(),
            }
        }
        EventKind::APPROVAL => format!(
            "approved {}@{} by {}",
            text("branch"),
            text("commit"),
            text("approver")
        ),
        EventKind::DECISION => format!("{} -> {}", text("question"), text("decision")),
        EventKind::LESSON => text("lesson"),
        EventKind::AGENT_START => format!("started: {}", text("detail")),
        EventKind::AGENT_ACTION => format!("{}: {}", text("action"), text("detail")),
        EventKind::AGENT_COMPLETE => format!("completed: {}", text("detail")),
        EventKind::AGENT_ERROR => format!("error: {}", text("error")),
        _ => serde_json::Value::Object(record.data.clone()).to_string(),
    }
}

/// Render the sequence as a full-fidelity JSON array.
pub fn render_json(records: &[EventRecord]) -> LogResult<String> {
    serde_json::to_string_pretty(records).map_err(|e| LogError::Serialize {
        reason: format!("failed to render JSON export: {}", e),
    })
}

/// Render the sequence as a flattened CSV table.
///
/// Nested `data` payloads are stringified as compact JSON in one column.
/// An empty sequence yields a header-only document.
pub fn render_csv(records: &[EventRecord]) -> LogResult<String> {
    let csv_err = |e: csv::Error| LogError::Serialize {
        reason: format!("failed to render CSV export: {}", e),
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "id",
            "type",
            "ts",
            "subject_id",
            "actor_id",
            "role",
            "data",
            "prev_hash",
            "hash",
        ])
        .map_err(csv_err)?;

    for record in records {
        writer
            .write_record([
                record.id.as_str(),
                record.kind.as_str(),
                &record.ts.to_rfc3339(),
                record.subject_id.as_str(),
                record.actor_id.as_deref().unwrap_or(""),
                record.role.as_deref().unwrap_or(""),
                &serde_json::Value::Object(record.data.clone()).to_string(),
                record.prev_hash.as_str(),
                record.hash.as_str(),
            ])
            .map_err(csv_err)?;
    }

    let bytes = writer.into_inner().map_err(|e| LogError::Serialize {
        reason: format!("failed to flush CSV export: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| LogError::Serialize {
        reason: format!("CSV export is not valid UTF-8: {}", e),
    })
}
