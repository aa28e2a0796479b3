//! # randfocus Core Library
//!
//! This library provides the business logic for randfocus, a single-session
//! focus timer that nudges you with breaks at randomized moments. Everything
//! is reachable from the standalone CLI; the library holds no resident
//! process, so each caller reloads state, advances it, and writes it back.
//!
//! ## Architecture
//!
//! - **Session**: config normalization, randomized break schedule generation,
//!   and a persisted lifecycle state machine that the caller polls
//! - **Storage**: key-value persistence (SQLite or in-memory) holding the live
//!   session and the append-only history log, plus TOML configuration
//! - **Effects**: fire-and-forget sound playback and desktop notifications
//!
//! ## Key Components
//!
//! - [`SessionController`]: start/poll/complete/stop transitions
//! - [`SessionStore`]: typed session and history persistence
//! - [`Database`]: SQLite-backed [`KvStore`]
//! - [`Config`]: application configuration management

pub mod effects;
pub mod error;
pub mod events;
pub mod session;
pub mod stats;
pub mod storage;

pub use effects::{NoEffects, RecordingEffects, SideEffects, SystemEffects};
pub use error::{ConfigError, CoreError, StoreError};
pub use events::Event;
pub use session::{
    generate_break_schedule, normalize, PcgSource, RandomSource, SessionConfig,
    SessionConfigInput, SessionController, SessionRecord, SessionSnapshot, SessionState,
    SoundPool,
};
pub use stats::{DayStats, Stats};
pub use storage::{Config, Database, KvStore, MemoryStore, SessionStore};
