pub mod config;
pub mod database;
pub mod kv;
pub mod session_store;

pub use config::Config;
pub use database::Database;
pub use kv::{KvStore, MemoryStore};
pub use session_store::{SessionStore, HISTORY_KEY, SESSION_KEY};

use std::path::PathBuf;

/// Returns the randfocus data directory, creating it if needed.
///
/// `RANDFOCUS_DATA_DIR` overrides the location entirely. Otherwise this is
/// `~/.config/randfocus[-dev]/`, with RANDFOCUS_ENV=dev selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("RANDFOCUS_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("RANDFOCUS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("randfocus-dev")
            } else {
                base_dir.join("randfocus")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
