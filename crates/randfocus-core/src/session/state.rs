//! Persisted session state and history records.
//!
//! Both types are stored as camelCase JSON so payloads written by earlier
//! versions of the tool keep decoding. Missing `description` and
//! `usedSounds` fields default to empty.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::config::SessionConfig;

const MS_PER_MINUTE: i64 = 60_000;

/// The single live focus session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub active: bool,
    /// Epoch milliseconds.
    pub started_at: i64,
    pub focus_duration_minutes: u32,
    pub break_schedule_minutes: Vec<u32>,
    /// Breaks already announced. Only ever grows.
    #[serde(default)]
    pub triggered_break_minutes: BTreeSet<u32>,
    /// Sounds already played this session, in play order.
    #[serde(default)]
    pub used_sounds: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl SessionState {
    /// Fresh active session.
    pub fn new(
        started_at: i64,
        config: &SessionConfig,
        break_schedule_minutes: Vec<u32>,
        description: &str,
    ) -> Self {
        Self {
            active: true,
            started_at,
            focus_duration_minutes: config.focus_duration_min,
            break_schedule_minutes,
            triggered_break_minutes: BTreeSet::new(),
            used_sounds: Vec::new(),
            description: description.trim().to_string(),
        }
    }

    /// Whole minutes elapsed since start at `now`. Negative under clock skew.
    pub fn elapsed_minutes(&self, now: i64) -> i64 {
        diff_minutes(self.started_at, now)
    }

    /// Scheduled breaks that are due at `elapsed` and not yet announced.
    pub fn newly_due_breaks(&self, elapsed: i64) -> Vec<u32> {
        self.break_schedule_minutes
            .iter()
            .copied()
            .filter(|m| i64::from(*m) <= elapsed && !self.triggered_break_minutes.contains(m))
            .collect()
    }

    /// The first scheduled break not yet announced.
    pub fn next_pending_break(&self) -> Option<u32> {
        self.break_schedule_minutes
            .iter()
            .copied()
            .find(|m| !self.triggered_break_minutes.contains(m))
    }

    /// Freeze this session into a history record ending at `ended_at`.
    pub fn to_record(&self, id: String, ended_at: i64) -> SessionRecord {
        SessionRecord {
            id,
            started_at: self.started_at,
            ended_at,
            planned_duration_minutes: self.focus_duration_minutes,
            actual_duration_minutes: actual_duration_minutes(self.started_at, ended_at),
            break_schedule_minutes: self.break_schedule_minutes.clone(),
            description: self.description.clone(),
        }
    }
}

/// An archived session. Never modified after it is appended to history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub started_at: i64,
    pub ended_at: i64,
    pub planned_duration_minutes: u32,
    pub actual_duration_minutes: u32,
    pub break_schedule_minutes: Vec<u32>,
    #[serde(default)]
    pub description: String,
}

/// Floor of `(to - from)` in whole minutes.
pub fn diff_minutes(from_ms: i64, to_ms: i64) -> i64 {
    to_ms.saturating_sub(from_ms).div_euclid(MS_PER_MINUTE)
}

/// Duration in whole minutes, never negative.
pub fn actual_duration_minutes(started_at: i64, ended_at: i64) -> u32 {
    u32::try_from(diff_minutes(started_at, ended_at).max(0)).unwrap_or(u32::MAX)
}

/// Current wall clock in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> SessionState {
        let mut state = SessionState::new(
            1_700_000_000_000,
            &SessionConfig::default(),
            vec![25, 40, 62],
            "  write the report ",
        );
        state.triggered_break_minutes.insert(25);
        state.used_sounds.push("/System/Library/Sounds/Pop.aiff".into());
        state
    }

    #[test]
    fn new_state_is_active_and_trims_description() {
        let state = SessionState::new(0, &SessionConfig::default(), vec![30], "  deep work\n");
        assert!(state.active);
        assert_eq!(state.description, "deep work");
        assert_eq!(state.focus_duration_minutes, 90);
        assert!(state.triggered_break_minutes.is_empty());
        assert!(state.used_sounds.is_empty());
    }

    #[test]
    fn diff_minutes_floors() {
        assert_eq!(diff_minutes(0, 59_999), 0);
        assert_eq!(diff_minutes(0, 60_000), 1);
        assert_eq!(diff_minutes(0, 150_000), 2);
        assert_eq!(diff_minutes(60_000, 0), -1);
        assert_eq!(diff_minutes(1, 0), -1);
    }

    #[test]
    fn diff_minutes_saturates_on_corrupt_timestamps() {
        assert_eq!(diff_minutes(i64::MIN, i64::MAX), i64::MAX.div_euclid(60_000));
        assert_eq!(diff_minutes(i64::MAX, i64::MIN), i64::MIN.div_euclid(60_000));
        assert_eq!(actual_duration_minutes(i64::MAX, 0), 0);
    }

    #[test]
    fn actual_duration_never_negative() {
        assert_eq!(actual_duration_minutes(120_000, 0), 0);
        assert_eq!(actual_duration_minutes(0, 90 * 60_000), 90);
    }

    #[test]
    fn newly_due_skips_triggered_and_future() {
        let state = sample_state();
        assert_eq!(state.newly_due_breaks(24), Vec::<u32>::new());
        assert_eq!(state.newly_due_breaks(45), vec![40]);
        assert_eq!(state.newly_due_breaks(90), vec![40, 62]);
        assert_eq!(state.next_pending_break(), Some(40));
    }

    #[test]
    fn record_copies_state_fields() {
        let state = sample_state();
        let ended = state.started_at + 30 * 60_000 + 5_000;
        let record = state.to_record("abc".into(), ended);
        assert_eq!(record.planned_duration_minutes, 90);
        assert_eq!(record.actual_duration_minutes, 30);
        assert_eq!(record.break_schedule_minutes, vec![25, 40, 62]);
        assert_eq!(record.description, "write the report");
    }

    #[test]
    fn state_roundtrips_through_json() {
        let state = sample_state();
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"breakScheduleMinutes\":[25,40,62]"));
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn legacy_payload_without_optional_fields_decodes() {
        let json = r#"{
            "active": true,
            "startedAt": 1000,
            "focusDurationMinutes": 60,
            "breakScheduleMinutes": [30],
            "triggeredBreakMinutes": [30, 30]
        }"#;
        let state: SessionState = serde_json::from_str(json).unwrap();
        assert_eq!(state.description, "");
        assert!(state.used_sounds.is_empty());
        assert_eq!(state.triggered_break_minutes.len(), 1);
    }

    #[test]
    fn record_without_description_decodes() {
        let json = r#"{"id":"x","startedAt":0,"endedAt":60000,
            "plannedDurationMinutes":90,"actualDurationMinutes":1,"breakScheduleMinutes":[]}"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.description, "");
    }
}
