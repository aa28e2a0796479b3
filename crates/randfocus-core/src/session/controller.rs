//! Session lifecycle controller.
//!
//! A persisted state machine with no resident process behind it: every
//! operation takes the state it acts on (or reloads it from the store),
//! writes the result back, and only then fires side effects.
//!
//! ## State Transitions
//!
//! ```text
//! NoSession -> Active -> (Completed: inactive state kept | Stopped: state removed)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut ctl = SessionController::new(db, effects, PcgSource::from_entropy(), sounds);
//! ctl.start("write the report", &input, now_ms())?;
//! // On every external trigger (CLI call, timer tick):
//! ctl.poll_stored(now_ms())?;
//! ```

use serde::{Deserialize, Serialize};

use super::config::{normalize, SessionConfigInput};
use super::schedule::RandomSource;
use super::sounds::SoundPool;
use super::state::{SessionRecord, SessionState};
use crate::effects::SideEffects;
use crate::error::{CoreError, Result};
use crate::events::{at_ms, Event};
use crate::storage::{KvStore, SessionStore};

/// Read-only view of the current session for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub active: bool,
    pub description: String,
    pub started_at: Option<i64>,
    pub focus_duration_minutes: u32,
    /// Clamped to `[0, focus_duration_minutes]`.
    pub elapsed_minutes: u32,
    pub remaining_minutes: u32,
    pub next_break_minute: Option<u32>,
    pub break_schedule_minutes: Vec<u32>,
    pub triggered_break_minutes: Vec<u32>,
}

/// Drives start/poll/complete/stop over the persisted session.
pub struct SessionController<S, E, R> {
    store: SessionStore<S>,
    effects: E,
    rng: R,
    sounds: SoundPool,
}

impl<S: KvStore, E: SideEffects, R: RandomSource> SessionController<S, E, R> {
    pub fn new(kv: S, effects: E, rng: R, sounds: SoundPool) -> Self {
        Self {
            store: SessionStore::new(kv),
            effects,
            rng,
            sounds,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn sounds(&self) -> &SoundPool {
        &self.sounds
    }

    pub fn history(&self) -> Result<Vec<SessionRecord>> {
        self.store.load_history()
    }

    /// Snapshot of the stored session at `now`, without mutating anything.
    pub fn status(&self, now: i64) -> Result<SessionSnapshot> {
        let Some(state) = self.store.load_session()? else {
            return Ok(SessionSnapshot::default());
        };
        if !state.active {
            return Ok(SessionSnapshot::default());
        }
        let focus = state.focus_duration_minutes;
        let elapsed = state
            .elapsed_minutes(now)
            .clamp(0, i64::from(focus)) as u32;
        Ok(SessionSnapshot {
            active: true,
            description: state.description.clone(),
            started_at: Some(state.started_at),
            focus_duration_minutes: focus,
            elapsed_minutes: elapsed,
            remaining_minutes: focus - elapsed,
            next_break_minute: state.next_pending_break(),
            break_schedule_minutes: state.break_schedule_minutes.clone(),
            triggered_break_minutes: state.triggered_break_minutes.iter().copied().collect(),
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a new session.
    ///
    /// # Errors
    /// `AlreadyActive` if a session is running; store errors if persisting fails.
    pub fn start(
        &mut self,
        description: &str,
        input: &SessionConfigInput,
        now: i64,
    ) -> Result<(SessionState, Event)> {
        if let Some(current) = self.store.load_session()? {
            if current.active {
                return Err(CoreError::AlreadyActive {
                    started_at: current.started_at,
                });
            }
        }

        let config = normalize(input);
        let schedule = config.break_schedule(&mut self.rng);
        let state = SessionState::new(now, &config, schedule, description);
        tracing::debug!(
            focus_duration = config.focus_duration_min,
            schedule = ?state.break_schedule_minutes,
            description = %state.description,
            "generated break schedule"
        );

        self.store.save_session(&state)?;

        let event = Event::SessionStarted {
            focus_duration_min: state.focus_duration_minutes,
            break_schedule_minutes: state.break_schedule_minutes.clone(),
            description: state.description.clone(),
            at: at_ms(now),
        };
        tracing::info!(focus_duration = config.focus_duration_min, "focus session started");
        self.effects.notify(&event.message());
        Ok((state, event))
    }

    /// Advance `state` to `now`: complete it if its time is up, otherwise fire due breaks.
    ///
    /// Repeated calls at the same minute are no-ops, and an inactive state is
    /// returned untouched.
    pub fn poll(&mut self, state: SessionState, now: i64) -> Result<(SessionState, Option<Event>)> {
        if !state.active {
            return Ok((state, None));
        }
        let elapsed = state.elapsed_minutes(now);
        if elapsed >= i64::from(state.focus_duration_minutes) {
            let (state, event) = self.complete(state, now)?;
            Ok((state, Some(event)))
        } else {
            self.check_breaks(state, elapsed)
        }
    }

    /// Fire every break due at `elapsed_minutes` that has not fired yet.
    ///
    /// Breaks that became due together share one sound and one notification.
    /// When nothing is due the state comes back unchanged and nothing is written.
    pub fn check_breaks(
        &mut self,
        mut state: SessionState,
        elapsed_minutes: i64,
    ) -> Result<(SessionState, Option<Event>)> {
        let newly_due = state.newly_due_breaks(elapsed_minutes);
        if newly_due.is_empty() {
            return Ok((state, None));
        }

        let sound = self.sounds.pick_unused(&state.used_sounds, &mut self.rng);
        if let Some(ref s) = sound {
            state.used_sounds.push(s.clone());
        }
        state.triggered_break_minutes.extend(newly_due.iter().copied());
        self.store.save_session(&state)?;

        let event = Event::BreakOpportunity {
            elapsed_minutes,
            break_minutes: newly_due,
            sound: sound.clone(),
            at: at_ms(state.started_at + elapsed_minutes * 60_000),
        };
        tracing::info!(elapsed_minutes, sound = ?sound, "break opportunity");
        if let Some(ref s) = sound {
            self.effects.play(s);
        }
        self.effects.notify(&event.message());
        Ok((state, Some(event)))
    }

    /// Close out a session that ran its full length.
    ///
    /// The record goes to history and an inactive copy of the state is kept.
    pub fn complete(&mut self, state: SessionState, now: i64) -> Result<(SessionState, Event)> {
        let record = state.to_record(new_record_id(), now);
        self.store.append_history(record.clone())?;
        let finished = SessionState {
            active: false,
            ..state
        };
        self.store.save_session(&finished)?;

        tracing::info!(
            id = %record.id,
            actual_minutes = record.actual_duration_minutes,
            "focus session complete"
        );
        let event = Event::SessionCompleted {
            record,
            at: at_ms(now),
        };
        self.play_end_sound();
        self.effects.notify(&event.message());
        Ok((finished, event))
    }

    /// End a session before its planned duration. The stored session is removed.
    pub fn stop_early(&mut self, state: &SessionState, now: i64) -> Result<Event> {
        let record = state.to_record(new_record_id(), now);
        self.store.append_history(record.clone())?;
        self.store.clear_session()?;

        tracing::info!(
            id = %record.id,
            actual_minutes = record.actual_duration_minutes,
            "focus session stopped"
        );
        let event = Event::SessionStopped {
            record,
            at: at_ms(now),
        };
        self.play_end_sound();
        self.effects.notify(&event.message());
        Ok(event)
    }

    /// Reload the stored session and poll it.
    ///
    /// Returns `None` when there is no active session.
    pub fn poll_stored(&mut self, now: i64) -> Result<Option<(SessionState, Option<Event>)>> {
        match self.store.load_session()? {
            Some(state) if state.active => self.poll(state, now).map(Some),
            _ => Ok(None),
        }
    }

    /// Reload the stored session and stop it early.
    ///
    /// # Errors
    /// `NoActiveSession` if nothing is running.
    pub fn stop_stored(&mut self, now: i64) -> Result<Event> {
        match self.store.load_session()? {
            Some(state) if state.active => self.stop_early(&state, now),
            _ => Err(CoreError::NoActiveSession),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn play_end_sound(&self) {
        if let Some(sound) = self.sounds.end_sound() {
            self.effects.play(sound);
        }
    }
}

fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
