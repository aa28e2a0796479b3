pub mod config;
pub mod history;
pub mod session;

use randfocus_core::{Config, Database, PcgSource, SessionController, SystemEffects};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub type Controller = SessionController<Database, SystemEffects, PcgSource>;

/// Build a controller over the on-disk store with effects from `config`.
pub fn open_controller(config: &Config) -> Result<Controller, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let effects = SystemEffects::new(&config.sounds, &config.notifications);
    Ok(SessionController::new(
        db,
        effects,
        PcgSource::from_entropy(),
        config.sound_pool(),
    ))
}
