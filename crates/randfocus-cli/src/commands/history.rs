use chrono::{DateTime, Local, Utc};
use clap::Subcommand;
use randfocus_core::stats::{all_stats, newest_first, today_stats};
use randfocus_core::{Database, SessionRecord, SessionStore};

use super::CliResult;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List sessions, newest first
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
        /// Show at most this many sessions
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one session in detail
    Show {
        /// Session ID
        id: String,
    },
    /// Today's session count and focus minutes
    Today,
    /// All-time stats
    Stats,
}

fn format_date(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|t| t.with_timezone(&Local).format("%b %-d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

fn title(record: &SessionRecord) -> &str {
    if record.description.is_empty() {
        "Focus session"
    } else {
        &record.description
    }
}

fn format_schedule(minutes: &[u32]) -> String {
    if minutes.is_empty() {
        "none".into()
    } else {
        minutes
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn run(action: HistoryAction) -> CliResult {
    let store = SessionStore::new(Database::open()?);

    match action {
        HistoryAction::List { json, limit } => {
            let mut history = newest_first(store.load_history()?);
            if let Some(limit) = limit {
                history.truncate(limit);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else if history.is_empty() {
                println!("No focus sessions yet.");
            } else {
                for r in &history {
                    println!(
                        "{}  {:>3} min  {}  [{}]",
                        format_date(r.started_at),
                        r.actual_duration_minutes,
                        title(r),
                        r.id
                    );
                }
            }
        }
        HistoryAction::Show { id } => {
            let record = store
                .find_record(&id)?
                .ok_or_else(|| format!("no session with id {id}"))?;
            println!("# {}", title(&record));
            println!();
            println!("- Started: {}", format_date(record.started_at));
            println!("- Ended: {}", format_date(record.ended_at));
            println!("- Planned: {} min", record.planned_duration_minutes);
            println!("- Actual: {} min", record.actual_duration_minutes);
            println!(
                "- Break schedule: {}",
                format_schedule(&record.break_schedule_minutes)
            );
        }
        HistoryAction::Today => {
            let stats = today_stats(&store.load_history()?, Utc::now());
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        HistoryAction::Stats => {
            let stats = all_stats(&store.load_history()?, Utc::now());
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
