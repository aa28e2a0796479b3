use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionRecord;

/// Every session lifecycle transition produces an Event.
/// The CLI prints them; side effects are derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        focus_duration_min: u32,
        break_schedule_minutes: Vec<u32>,
        description: String,
        at: DateTime<Utc>,
    },
    /// One or more scheduled breaks became due. Simultaneous breaks are merged.
    BreakOpportunity {
        elapsed_minutes: i64,
        break_minutes: Vec<u32>,
        /// `None` once the sound pool is exhausted.
        sound: Option<String>,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        record: SessionRecord,
        at: DateTime<Utc>,
    },
    SessionStopped {
        record: SessionRecord,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Notification text shown to the user for this event.
    pub fn message(&self) -> String {
        match self {
            Event::SessionStarted {
                focus_duration_min, ..
            } => format!("Focus session started ({focus_duration_min} min)"),
            Event::BreakOpportunity {
                elapsed_minutes, ..
            } => format!("Break opportunity - you've focused {elapsed_minutes} min"),
            Event::SessionCompleted { .. } => "Focus session complete! Take a real break".into(),
            Event::SessionStopped { .. } => "Focus session stopped".into(),
        }
    }
}

/// Convert epoch milliseconds to a UTC timestamp, clamping out-of-range values to the epoch.
pub(crate) fn at_ms(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_with_type_tag() {
        let event = Event::BreakOpportunity {
            elapsed_minutes: 31,
            break_minutes: vec![30],
            sound: None,
            at: at_ms(0),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "BreakOpportunity");
        assert_eq!(json["break_minutes"][0], 30);
        assert_eq!(event.message(), "Break opportunity - you've focused 31 min");
    }
}
