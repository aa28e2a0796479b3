//! Audio and notification side effects.
//!
//! Side effects are fire-and-forget: they return nothing, and any failure is
//! logged and dropped so the session state written before them stands.

use std::cell::RefCell;
use std::process::{Command, Stdio};

use crate::storage::config::{NotificationsConfig, SoundsConfig};

/// Capability the session controller uses to play sounds and show notifications.
pub trait SideEffects {
    /// Play a sound resource, identified by a path or platform identifier.
    fn play(&self, sound: &str);
    /// Show a notification message.
    fn notify(&self, message: &str);
}

/// Plays sounds through an external player process and shows desktop notifications.
#[derive(Debug, Clone)]
pub struct SystemEffects {
    player: Option<String>,
    notifications: bool,
}

impl SystemEffects {
    pub fn new(sounds: &SoundsConfig, notifications: &NotificationsConfig) -> Self {
        Self {
            player: sounds.enabled.then(|| sounds.player.clone()),
            notifications: notifications.enabled,
        }
    }
}

impl SideEffects for SystemEffects {
    fn play(&self, sound: &str) {
        let Some(player) = self.player.as_deref() else {
            return;
        };
        // The child is not awaited; it outlives short CLI invocations.
        match Command::new(player)
            .arg(sound)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(_) => tracing::debug!(player, sound, "sound started"),
            Err(e) => tracing::warn!(player, sound, error = %e, "failed to play sound"),
        }
    }

    fn notify(&self, message: &str) {
        tracing::info!("{message}");
        if !self.notifications {
            return;
        }
        if let Err(e) = notify_rust::Notification::new()
            .summary("randfocus")
            .body(message)
            .appname("randfocus")
            .show()
        {
            tracing::warn!(error = %e, "failed to show notification");
        }
    }
}

/// Does nothing. Used when running headless.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEffects;

impl SideEffects for NoEffects {
    fn play(&self, _sound: &str) {}
    fn notify(&self, _message: &str) {}
}

/// A side effect captured by [`RecordingEffects`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Played(String),
    Notified(String),
}

/// Records side effects instead of performing them.
#[derive(Debug, Default)]
pub struct RecordingEffects {
    log: RefCell<Vec<Effect>>,
}

impl RecordingEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> Vec<Effect> {
        self.log.borrow().clone()
    }

    pub fn played(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Effect::Played(s) => Some(s.clone()),
                Effect::Notified(_) => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Effect::Notified(m) => Some(m.clone()),
                Effect::Played(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl SideEffects for RecordingEffects {
    fn play(&self, sound: &str) {
        self.log.borrow_mut().push(Effect::Played(sound.to_string()));
    }

    fn notify(&self, message: &str) {
        self.log.borrow_mut().push(Effect::Notified(message.to_string()));
    }
}
