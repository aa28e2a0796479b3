//! Session and history persistence on top of a [`KvStore`].
//!
//! Corrupt payloads read as "no data" rather than an error: a broken live
//! session reads as no session, a broken history as an empty log. Backend
//! failures still propagate.

use crate::error::Result;
use crate::session::{SessionRecord, SessionState};

use super::kv::KvStore;

pub const SESSION_KEY: &str = "random-focus-session-state";
pub const HISTORY_KEY: &str = "random-focus-session-history";

/// Typed access to the live session and the history log.
#[derive(Debug)]
pub struct SessionStore<S> {
    kv: S,
}

impl<S: KvStore> SessionStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Load the persisted session, if any.
    pub fn load_session(&self) -> Result<Option<SessionState>> {
        let Some(raw) = self.kv.get(SESSION_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<SessionState>(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!(error = %e, "stored session is unreadable, treating as absent");
                Ok(None)
            }
        }
    }

    pub fn save_session(&self, state: &SessionState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.kv.set(SESSION_KEY, &json)?;
        Ok(())
    }

    pub fn clear_session(&self) -> Result<()> {
        self.kv.remove(SESSION_KEY)?;
        Ok(())
    }

    /// Load the full history log, oldest first.
    pub fn load_history(&self) -> Result<Vec<SessionRecord>> {
        let Some(raw) = self.kv.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<SessionRecord>>(&raw) {
            Ok(history) => Ok(history),
            Err(e) => {
                tracing::warn!(error = %e, "stored history is unreadable, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn save_history(&self, history: &[SessionRecord]) -> Result<()> {
        let json = serde_json::to_string(history)?;
        self.kv.set(HISTORY_KEY, &json)?;
        Ok(())
    }

    /// Append one record to the history log.
    ///
    /// Read-modify-write of the whole log; not safe against concurrent writers.
    pub fn append_history(&self, record: SessionRecord) -> Result<()> {
        let mut history = self.load_history()?;
        history.push(record);
        self.save_history(&history)
    }

    pub fn find_record(&self, id: &str) -> Result<Option<SessionRecord>> {
        Ok(self.load_history()?.into_iter().find(|r| r.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionConfig;
    use crate::storage::MemoryStore;

    fn record(id: &str, started_at: i64) -> SessionRecord {
        SessionRecord {
            id: id.into(),
            started_at,
            ended_at: started_at + 45 * 60_000,
            planned_duration_minutes: 90,
            actual_duration_minutes: 45,
            break_schedule_minutes: vec![30, 55],
            description: format!("session {id}"),
        }
    }

    #[test]
    fn empty_store_has_no_session_or_history() {
        let store = SessionStore::new(MemoryStore::new());
        assert!(store.load_session().unwrap().is_none());
        assert!(store.load_history().unwrap().is_empty());
    }

    #[test]
    fn session_roundtrip_and_clear() {
        let store = SessionStore::new(MemoryStore::new());
        let mut state = SessionState::new(5_000, &SessionConfig::default(), vec![22, 48], "x");
        state.triggered_break_minutes.insert(22);
        state.used_sounds.push("Ping".into());
        store.save_session(&state).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(state));
        store.clear_session().unwrap();
        assert!(store.load_session().unwrap().is_none());
    }

    #[test]
    fn corrupt_session_reads_as_absent() {
        let store = SessionStore::new(MemoryStore::new());
        store.kv().set(SESSION_KEY, "{not json").unwrap();
        assert!(store.load_session().unwrap().is_none());
    }

    #[test]
    fn corrupt_history_reads_as_empty() {
        let store = SessionStore::new(MemoryStore::new());
        store.kv().set(HISTORY_KEY, "[{\"id\": 3}]").unwrap();
        assert!(store.load_history().unwrap().is_empty());
    }

    #[test]
    fn append_keeps_order_and_finds_by_id() {
        let store = SessionStore::new(MemoryStore::new());
        store.append_history(record("a", 0)).unwrap();
        store.append_history(record("b", 1)).unwrap();
        let history = store.load_history().unwrap();
        assert_eq!(history, vec![record("a", 0), record("b", 1)]);
        assert_eq!(store.find_record("b").unwrap(), Some(record("b", 1)));
        assert!(store.find_record("zzz").unwrap().is_none());
    }

    #[test]
    fn append_over_corrupt_history_starts_fresh() {
        let store = SessionStore::new(MemoryStore::new());
        store.kv().set(HISTORY_KEY, "garbage").unwrap();
        store.append_history(record("a", 0)).unwrap();
        assert_eq!(store.load_history().unwrap().len(), 1);
    }
}
