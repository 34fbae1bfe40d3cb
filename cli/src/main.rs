//! attest — query, verify, and export the workflow event log.
//!
//! The emitting side of the system (build/deploy/decision tooling) appends
//! through `attest-trails`; this binary is the read side.  All subcommands
//! operate on the log file named by `--log`, the config file, or the default
//! `.attest/events.jsonl`.
//!
//! Usage:
//!   attest recent -n 20
//!   attest show --kind verification --subject ws-1 --page 2
//!   attest export csv
//!   attest trace --commit abc1234 --verify
//!   attest verify
//!   attest stats
//!   attest decisions "should we use SQLite?" --tag storage
//!
//! A chain-verification failure exits non-zero.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use attest_contracts::{EventRecord, LogError, LogResult};
use attest_log::{read_all, read_tolerant, verify_chain};
use attest_recall::{find_similar, Outcome};

mod config;

use config::{CliConfig, DEFAULT_LOG_PATH, DEFAULT_PAGE_SIZE};

// ── CLI definition ────────────────────────────────────────────────────────────

/// attest — tamper-evident workflow event log.
#[derive(Parser)]
#[command(
    name = "attest",
    about = "Query, verify, and export the hash-chained workflow event log"
)]
struct Cli {
    /// Path to the event log file (overrides the config file).
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the most recent events.
    Recent {
        /// How many events to show.
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },

    /// Show events, filtered and paginated.
    Show {
        /// Keep only this event type.
        #[arg(long, default_value = "")]
        kind: String,
        /// Keep only events about this workstream/task.
        #[arg(long, default_value = "")]
        subject: String,
        /// Keep only events from this agent.
        #[arg(long, default_value = "")]
        actor: String,
        /// Keep only events whose payload names this model.
        #[arg(long, default_value = "")]
        model: String,
        /// Keep only events whose payload commit starts with this SHA.
        #[arg(long, default_value = "")]
        commit: String,
        /// Keep events at or after this time (RFC 3339 or YYYY-MM-DD).
        #[arg(long)]
        since: Option<String>,
        /// Keep events whose free-text fields contain this substring.
        #[arg(long, default_value = "")]
        search: String,
        /// 1-indexed page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Events per page.
        #[arg(long)]
        page_size: Option<usize>,
        /// Emit the page as JSON instead of the human report.
        #[arg(long)]
        json: bool,
    },

    /// Export the full log.
    Export {
        /// Output format.
        format: ExportFormat,
    },

    /// Show every event for one subject or commit.
    Trace {
        /// Trace by workstream/task id.
        #[arg(long, default_value = "")]
        subject: String,
        /// Trace by commit SHA (prefix match).
        #[arg(long, default_value = "")]
        commit: String,
        /// Verify the whole chain before showing the trace.
        #[arg(long)]
        verify: bool,
    },

    /// Verify the integrity of the whole chain.
    Verify,

    /// Show aggregate statistics.
    Stats,

    /// Check a new decision question against recorded decision history.
    Decisions {
        /// The question under consideration.
        question: String,
        /// Tags to match against prior decisions (repeatable).
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = CliConfig::load_default().and_then(|config| run(cli, config));
    if let Err(e) = result {
        eprintln!("attest: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: CliConfig) -> LogResult<()> {
    let log_path = cli
        .log
        .or(config.log_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH));
    let records = load_records(&log_path, config.tolerant_reads)?;

    match cli.command {
        Command::Recent { count } => {
            let recent = attest_query::last_n(&records, count);
            if recent.is_empty() {
                println!("no events recorded");
            } else {
                print!("{}", attest_query::render_human(&recent));
            }
            Ok(())
        }

        Command::Show {
            kind,
            subject,
            actor,
            model,
            commit,
            since,
            search,
            page,
            page_size,
            json,
        } => {
            let mut filtered = attest_query::by_kind(&records, &kind);
            filtered = attest_query::by_subject(&filtered, &subject);
            filtered = attest_query::by_actor(&filtered, &actor);
            filtered = attest_query::by_model(&filtered, &model);
            filtered = attest_query::by_commit(&filtered, &commit);
            filtered = attest_query::by_search(&filtered, &search);
            if let Some(since) = since {
                filtered = attest_query::since(&filtered, parse_since(&since)?);
            }

            let size = page_size.or(config.page_size).unwrap_or(DEFAULT_PAGE_SIZE);
            let (slice, total) = attest_query::page(&filtered, page, size);

            if json {
                println!("{}", attest_query::render_json(&slice)?);
            } else {
                print!("{}", attest_query::render_human(&slice));
                println!("page {}: {} of {} matching events", page, slice.len(), total);
            }
            Ok(())
        }

        Command::Export { format } => {
            let rendered = match format {
                ExportFormat::Csv => attest_query::render_csv(&records)?,
                ExportFormat::Json => attest_query::render_json(&records)?,
            };
            print!("{}", rendered);
            if matches!(format, ExportFormat::Json) {
                println!();
            }
            Ok(())
        }

        Command::Trace {
            subject,
            commit,
            verify,
        } => {
            if subject.is_empty() && commit.is_empty() {
                return Err(LogError::Config {
                    reason: "trace requires --subject or --commit".to_string(),
                });
            }

            // Integrity is a property of the whole file, so the full chain is
            // verified before any filtering.
            if verify {
                verify_chain(&records)?;
                println!("chain OK: {} records", records.len());
            }

            let mut trace = attest_query::by_subject(&records, &subject);
            trace = attest_query::by_commit(&trace, &commit);
            if trace.is_empty() {
                println!("no matching events");
            } else {
                print!("{}", attest_query::render_human(&trace));
            }
            Ok(())
        }

        Command::Verify => {
            verify_chain(&records)?;
            println!("chain OK: {} records", records.len());
            Ok(())
        }

        Command::Stats => {
            print_stats(&attest_query::aggregate(&records));
            Ok(())
        }

        Command::Decisions { question, tags } => {
            let matches = find_similar(&question, &tags, &records);
            if matches.is_empty() {
                println!("no similar decisions recorded");
                return Ok(());
            }

            for m in &matches {
                println!(
                    "[{}] {} -> {} (subject {}, tags: {})",
                    m.outcome,
                    m.question,
                    m.decision,
                    m.subject_id,
                    m.tags.join(", ")
                );
            }
            if matches.iter().any(|m| m.outcome == Outcome::Failure) {
                // Advisory only; the exit code stays zero.
                println!();
                println!("warning: a similar decision previously led to a recorded failure");
            }
            Ok(())
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Load the log under the configured read policy.
///
/// Tolerant reads report every skipped line on stderr so the data loss is
/// visible even when the command succeeds.
fn load_records(path: &std::path::Path, tolerant: bool) -> LogResult<Vec<EventRecord>> {
    if !tolerant {
        return read_all(path);
    }

    let scan = read_tolerant(path)?;
    for skipped in &scan.skipped {
        eprintln!(
            "attest: skipped malformed line {}: {}",
            skipped.line, skipped.reason
        );
    }
    Ok(scan.records)
}

/// Parse `--since` as RFC 3339, or as a bare date meaning midnight UTC.
fn parse_since(s: &str) -> LogResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| LogError::Config {
        reason: format!("invalid --since '{}': expected RFC 3339 or YYYY-MM-DD ({})", s, e),
    })?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| LogError::Config {
        reason: format!("invalid --since '{}'", s),
    })?;
    Ok(DateTime::from_naive_utc_and_offset(midnight, Utc))
}

fn print_stats(stats: &attest_query::LogStats) {
    println!("total events: {}", stats.total);
    print_counts("by type", &stats.by_kind);
    print_counts("by model", &stats.by_model);
    print_counts("by date", &stats.by_date);
    print_counts("by agent", &stats.by_actor);
    print_counts("by role", &stats.by_role);
}

fn print_counts(label: &str, counts: &std::collections::BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }
    println!("{}:", label);
    for (key, count) in counts {
        println!("  {:<28} {}", key, count);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::parse_since;

    #[test]
    fn parse_since_accepts_rfc3339() {
        let ts = parse_since("2026-08-07T09:30:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 8, 7, 9, 30, 0).unwrap());
    }

    #[test]
    fn parse_since_accepts_bare_date_as_midnight_utc() {
        let ts = parse_since("2026-08-07").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 8, 7, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_since_rejects_garbage() {
        assert!(parse_since("yesterday").is_err());
    }
}
