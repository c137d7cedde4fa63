pub mod agent;
pub mod asset;
pub mod behaviours;
pub mod config;
pub mod environment;
pub mod error;
pub mod game;
pub mod input;
pub mod scene;
pub mod terrain;
pub mod time;

use std::path::Path;

pub use config::GameConfig;
pub use error::SceneError;
pub use game::{Game, GameState};

/// Installs the `env_logger` backend. `RUST_LOG` overrides the default
/// `info` filter. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}

/// Loads the config at `config_path` (defaults when missing) and builds the
/// game from it.
pub fn run<P: AsRef<Path>>(config_path: P) -> Result<Game, SceneError> {
    init_logging();

    let config = GameConfig::load_from_path(config_path);
    log::info!("Starting beacon course");

    let game = Game::new(config)?;
    if log::log_enabled!(log::Level::Trace) {
        game.active_level().scene.debug_print_hierarchy();
    }
    Ok(game)
}
