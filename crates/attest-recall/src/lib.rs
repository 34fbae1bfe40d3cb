//! # attest-recall
//!
//! Heuristic retrieval of past decision records resembling a new question.
//!
//! Similarity is keyword and tag overlap, deliberately not semantic
//! embedding: this is an advisory feature consumers use to print a
//! non-blocking warning before repeating a decision that previously led to
//! a recorded failure.  False negatives are acceptable; the threshold is
//! tuned so false positives stay rare enough not to become noise.

use std::collections::BTreeSet;

use attest_contracts::{EventKind, EventRecord};

/// The recorded outcome of a past decision, parsed from the payload
/// `outcome` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
    Unknown,
}

impl Outcome {
    /// Parse the conventional `outcome` payload values; anything
    /// unrecognized (or absent) is `Unknown`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("success") | Some("pass") | Some("passed") => Outcome::Success,
            Some("failure") | Some("fail") | Some("failed") => Outcome::Failure,
            _ => Outcome::Unknown,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success => f.write_str("success"),
            Outcome::Failure => f.write_str("failure"),
            Outcome::Unknown => f.write_str("unknown"),
        }
    }
}

/// One past decision surfaced as similar to the question under consideration.
#[derive(Debug, Clone)]
pub struct DecisionMatch {
    /// The prior question.
    pub question: String,
    /// What was decided.
    pub decision: String,
    /// The recorded outcome of that decision.
    pub outcome: Outcome,
    /// The workstream/task the decision belonged to.
    pub subject_id: String,
    /// The prior decision's tags.
    pub tags: Vec<String>,
    /// Overlap score; higher is more similar. Matches sort best-first.
    pub score: f32,
}

/// Words too common to carry signal for keyword overlap.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "be", "by", "can", "could", "do", "does", "for", "from", "how", "if",
    "in", "is", "it", "of", "on", "or", "our", "should", "that", "the", "this", "to", "we",
    "what", "when", "which", "will", "with", "would",
];

/// Lowercased, stop-worded keyword set for a free-text question.
fn keywords(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 2 && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Minimum combined score for a record to count as similar.
const SCORE_THRESHOLD: f32 = 0.2;

/// Find past `decision` records similar to `question`.
///
/// Scoring is Jaccard overlap over question keywords plus a 0.25 bonus per
/// shared tag.  A record matches when it shares at least one keyword or tag
/// and its score reaches the threshold.  Results sort best-first; records of
/// any other kind are ignored.
pub fn find_similar(
    question: &str,
    tags: &[String],
    history: &[EventRecord],
) -> Vec<DecisionMatch> {
    let query_keywords = keywords(question);
    let query_tags: BTreeSet<&str> = tags.iter().map(String::as_str).collect();

    let mut matches: Vec<DecisionMatch> = history
        .iter()
        .filter(|r| r.kind.as_str() == EventKind::DECISION)
        .filter_map(|record| {
            let prior_question = record.data_str("question").unwrap_or("");
            let prior_keywords = keywords(prior_question);
            let prior_tags: Vec<String> = record
                .data
                .get("tags")
                .and_then(|v| v.as_array())
                .map(|a| {
                    a.iter()
                        .filter_map(|t| t.as_str())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();

            let shared = query_keywords.intersection(&prior_keywords).count();
            let union = query_keywords.union(&prior_keywords).count();
            let jaccard = if union == 0 {
                0.0
            } else {
                shared as f32 / union as f32
            };

            let shared_tags = prior_tags
                .iter()
                .filter(|t| query_tags.contains(t.as_str()))
                .count();

            let score = jaccard + 0.25 * shared_tags as f32;
            if (shared == 0 && shared_tags == 0) || score < SCORE_THRESHOLD {
                return None;
            }

            Some(DecisionMatch {
                question: prior_question.to_string(),
                decision: record.data_str("decision").unwrap_or("").to_string(),
                outcome: Outcome::parse(record.data_str("outcome")),
                subject_id: record.subject_id.clone(),
                tags: prior_tags,
                score,
            })
        })
        .collect();

    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    matches
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use attest_contracts::{EventDraft, EventKind, EventRecord};

    use super::{find_similar, Outcome};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn decision(
        subject: &str,
        question: &str,
        decided: &str,
        outcome: Option<&str>,
        tags: &[&str],
    ) -> EventRecord {
        let mut draft = EventDraft::new(EventKind::DECISION, subject)
            .entry("question", question)
            .entry("decision", decided)
            .entry("tags", json!(tags));
        if let Some(outcome) = outcome {
            draft = draft.entry("outcome", outcome);
        }
        draft.into_record(String::new(), "unhashed".to_string())
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    /// A reworded question surfaces the prior decision and its failure
    /// outcome.
    #[test]
    fn test_reworded_question_surfaces_prior_failure() {
        let history = vec![decision(
            "ws-db",
            "Use SQLite or Postgres?",
            "SQLite",
            Some("failure"),
            &["storage"],
        )];

        let matches = find_similar("should we use SQLite?", &[], &history);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].question, "Use SQLite or Postgres?");
        assert_eq!(matches[0].decision, "SQLite");
        assert_eq!(matches[0].outcome, Outcome::Failure);
        assert_eq!(matches[0].subject_id, "ws-db");
    }

    /// Unrelated questions stay quiet.
    #[test]
    fn test_unrelated_question_matches_nothing() {
        let history = vec![decision(
            "ws-db",
            "Use SQLite or Postgres?",
            "SQLite",
            Some("failure"),
            &[],
        )];

        let matches = find_similar("which CI provider should we pick?", &[], &history);
        assert!(matches.is_empty());
    }

    /// Shared tags match even when the wording is disjoint.
    #[test]
    fn test_tag_overlap_matches_disjoint_wording() {
        let history = vec![decision(
            "ws-db",
            "Pick the persistence layer",
            "files on disk",
            Some("success"),
            &["storage", "architecture"],
        )];

        let matches = find_similar(
            "what backs the cache?",
            &["storage".to_string()],
            &history,
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].tags, ["storage", "architecture"]);
    }

    /// Only decision-kind records participate.
    #[test]
    fn test_non_decision_records_are_ignored() {
        let lesson = EventDraft::new(EventKind::LESSON, "ws-db")
            .entry("lesson", "SQLite locks under concurrent writers")
            .into_record(String::new(), "unhashed".to_string());

        let matches = find_similar("should we use SQLite?", &[], &[lesson]);
        assert!(matches.is_empty());
    }

    /// Closer wording ranks first.
    #[test]
    fn test_matches_sort_best_first() {
        let history = vec![
            decision("ws-a", "adopt SQLite for the job store?", "yes", None, &[]),
            decision(
                "ws-b",
                "Use SQLite or Postgres for the event store?",
                "Postgres",
                Some("success"),
                &[],
            ),
        ];

        let matches = find_similar("use SQLite for the event store?", &[], &history);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].subject_id, "ws-b");
        assert!(matches[0].score > matches[1].score);
    }

    /// Outcome parsing covers the conventional spellings.
    #[test]
    fn test_outcome_parsing() {
        assert_eq!(Outcome::parse(Some("success")), Outcome::Success);
        assert_eq!(Outcome::parse(Some("PASS")), Outcome::Success);
        assert_eq!(Outcome::parse(Some("failure")), Outcome::Failure);
        assert_eq!(Outcome::parse(Some("failed")), Outcome::Failure);
        assert_eq!(Outcome::parse(Some("shrug")), Outcome::Unknown);
        assert_eq!(Outcome::parse(None), Outcome::Unknown);
    }
}
