pub mod config;
mod controller;
mod schedule;
mod sounds;
mod state;

pub use config::{normalize, ConfigValue, SessionConfig, SessionConfigInput};
pub use controller::{SessionController, SessionSnapshot};
pub use schedule::{generate_break_schedule, FixedSource, PcgSource, RandomSource};
pub use sounds::SoundPool;
pub use state::{actual_duration_minutes, diff_minutes, now_ms, SessionRecord, SessionState};
