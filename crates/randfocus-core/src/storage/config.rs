//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default focus session parameters
//! - Sound pool and player command
//! - Notification preferences
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::session::config::{
    SessionConfig, SessionConfigInput, DEFAULT_FOCUS_DURATION_MIN,
    DEFAULT_MAX_BREAK_INTERVAL_MIN, DEFAULT_MIN_BREAK_INTERVAL_MIN, DEFAULT_NO_BREAK_AT_END_MIN,
    DEFAULT_NO_BREAK_AT_START_MIN,
};
use crate::session::SoundPool;

/// Default session parameters used when `session start` omits a flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDefaults {
    #[serde(default = "default_focus_duration")]
    pub focus_duration_min: u32,
    #[serde(default = "default_no_break_at_start")]
    pub no_break_at_start_min: u32,
    #[serde(default = "default_no_break_at_end")]
    pub no_break_at_end_min: u32,
    #[serde(default = "default_min_break_interval")]
    pub min_break_interval_min: u32,
    #[serde(default = "default_max_break_interval")]
    pub max_break_interval_min: u32,
}

/// Sound configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Command that plays a sound file given as its only argument.
    #[serde(default = "default_player")]
    pub player: String,
    /// Pool drawn from at each break; no sound repeats within a session.
    #[serde(default = "default_break_sounds")]
    pub break_sounds: Vec<String>,
    #[serde(default = "default_end_sound")]
    pub end_sound: String,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionDefaults,
    #[serde(default)]
    pub sounds: SoundsConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_focus_duration() -> u32 {
    DEFAULT_FOCUS_DURATION_MIN
}
fn default_no_break_at_start() -> u32 {
    DEFAULT_NO_BREAK_AT_START_MIN
}
fn default_no_break_at_end() -> u32 {
    DEFAULT_NO_BREAK_AT_END_MIN
}
fn default_min_break_interval() -> u32 {
    DEFAULT_MIN_BREAK_INTERVAL_MIN
}
fn default_max_break_interval() -> u32 {
    DEFAULT_MAX_BREAK_INTERVAL_MIN
}
fn default_true() -> bool {
    true
}

#[cfg(target_os = "macos")]
fn default_player() -> String {
    "afplay".into()
}
#[cfg(not(target_os = "macos"))]
fn default_player() -> String {
    "paplay".into()
}

#[cfg(target_os = "macos")]
fn default_break_sounds() -> Vec<String> {
    ["Ping", "Pop", "Submarine", "Hero", "Sosumi"]
        .iter()
        .map(|name| format!("/System/Library/Sounds/{name}.aiff"))
        .collect()
}
#[cfg(not(target_os = "macos"))]
fn default_break_sounds() -> Vec<String> {
    [
        "bell",
        "message",
        "dialog-information",
        "window-attention",
        "service-login",
    ]
    .iter()
    .map(|name| format!("/usr/share/sounds/freedesktop/stereo/{name}.oga"))
    .collect()
}

#[cfg(target_os = "macos")]
fn default_end_sound() -> String {
    "/System/Library/Sounds/Glass.aiff".into()
}
#[cfg(not(target_os = "macos"))]
fn default_end_sound() -> String {
    "/usr/share/sounds/freedesktop/stereo/complete.oga".into()
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            focus_duration_min: default_focus_duration(),
            no_break_at_start_min: default_no_break_at_start(),
            no_break_at_end_min: default_no_break_at_end(),
            min_break_interval_min: default_min_break_interval(),
            max_break_interval_min: default_max_break_interval(),
        }
    }
}

impl Default for SoundsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            player: default_player(),
            break_sounds: default_break_sounds(),
            end_sound: default_end_sound(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => serde_json::Value::Number(
                    value
                        .trim()
                        .parse::<u32>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as minutes")))?
                        .into(),
                ),
                serde_json::Value::Array(_) => {
                    let items: Vec<serde_json::Value> = if value.trim_start().starts_with('[') {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    } else {
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(|s| serde_json::Value::String(s.to_string()))
                            .collect()
                    };
                    serde_json::Value::Array(items)
                }
                serde_json::Value::Object(_) => return Err(invalid("not a leaf key".into())),
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Path of the config file inside the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Session defaults as normalizer input.
    pub fn session_input(&self) -> SessionConfigInput {
        SessionConfig {
            focus_duration_min: self.session.focus_duration_min,
            no_break_at_start_min: self.session.no_break_at_start_min,
            no_break_at_end_min: self.session.no_break_at_end_min,
            min_break_interval_min: self.session.min_break_interval_min,
            max_break_interval_min: self.session.max_break_interval_min,
        }
        .into()
    }

    /// Sounds the controller may play. Empty when sounds are disabled.
    pub fn sound_pool(&self) -> SoundPool {
        if self.sounds.enabled {
            SoundPool::new(self.sounds.break_sounds.clone(), Some(self.sounds.end_sound.clone()))
        } else {
            SoundPool::silent()
        }
    }
}
