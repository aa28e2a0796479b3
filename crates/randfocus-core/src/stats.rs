//! Aggregate statistics over the session history log.
//!
//! "Today" is the current UTC calendar day, matched against each record's
//! start time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::events::at_ms;
use crate::session::SessionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DayStats {
    pub sessions: u64,
    pub minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Stats {
    pub total_sessions: u64,
    pub total_focus_min: u64,
    /// Sessions that reached their planned duration.
    pub completed_sessions: u64,
    pub stopped_early: u64,
    pub today_sessions: u64,
    pub today_focus_min: u64,
}

fn utc_day(ms: i64) -> NaiveDate {
    at_ms(ms).date_naive()
}

/// Sessions started on the UTC day of `now`, with their focused minutes.
pub fn today_stats(history: &[SessionRecord], now: DateTime<Utc>) -> DayStats {
    let today = now.date_naive();
    history
        .iter()
        .filter(|r| utc_day(r.started_at) == today)
        .fold(DayStats::default(), |acc, r| DayStats {
            sessions: acc.sessions + 1,
            minutes: acc.minutes + u64::from(r.actual_duration_minutes),
        })
}

pub fn all_stats(history: &[SessionRecord], now: DateTime<Utc>) -> Stats {
    let today = today_stats(history, now);
    let completed = history
        .iter()
        .filter(|r| r.actual_duration_minutes >= r.planned_duration_minutes)
        .count() as u64;
    Stats {
        total_sessions: history.len() as u64,
        total_focus_min: history
            .iter()
            .map(|r| u64::from(r.actual_duration_minutes))
            .sum(),
        completed_sessions: completed,
        stopped_early: history.len() as u64 - completed,
        today_sessions: today.sessions,
        today_focus_min: today.minutes,
    }
}

/// History sorted newest first, as listings show it.
pub fn newest_first(mut history: Vec<SessionRecord>) -> Vec<SessionRecord> {
    history.sort_by(|a, b| b.started_at.cmp(&a.started_at));
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: &str, started_at: DateTime<Utc>, planned: u32, actual: u32) -> SessionRecord {
        let start = started_at.timestamp_millis();
        SessionRecord {
            id: id.into(),
            started_at: start,
            ended_at: start + i64::from(actual) * 60_000,
            planned_duration_minutes: planned,
            actual_duration_minutes: actual,
            break_schedule_minutes: vec![],
            description: String::new(),
        }
    }

    #[test]
    fn empty_history_is_zero() {
        assert_eq!(today_stats(&[], Utc::now()), DayStats::default());
        assert_eq!(all_stats(&[], Utc::now()), Stats::default());
    }

    #[test]
    fn today_counts_only_current_utc_day() {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 12, 0, 0).unwrap();
        let history = vec![
            record("yesterday", Utc.with_ymd_and_hms(2026, 3, 3, 23, 59, 0).unwrap(), 90, 90),
            record("morning", Utc.with_ymd_and_hms(2026, 3, 4, 0, 0, 0).unwrap(), 90, 45),
            record("noon", Utc.with_ymd_and_hms(2026, 3, 4, 11, 0, 0).unwrap(), 60, 60),
        ];
        assert_eq!(
            today_stats(&history, now),
            DayStats {
                sessions: 2,
                minutes: 105
            }
        );

        let stats = all_stats(&history, now);
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.total_focus_min, 195);
        assert_eq!(stats.completed_sessions, 2);
        assert_eq!(stats.stopped_early, 1);
        assert_eq!(stats.today_sessions, 2);
    }

    #[test]
    fn newest_first_sorts_descending() {
        let t = |h| Utc.with_ymd_and_hms(2026, 1, 1, h, 0, 0).unwrap();
        let sorted = newest_first(vec![record("a", t(1), 90, 1), record("b", t(3), 90, 1), record("c", t(2), 90, 1)]);
        let ids: Vec<_> = sorted.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }
}
