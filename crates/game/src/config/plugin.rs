use bevy::prelude::*;

use super::{CONFIG_PATH, ConfigError, ConfigLoaded, GameConfig};

/// Loads and validates the game config while the app is being built, so
/// plugins added after it can read [`ConfigLoaded`] in their own `build`.
///
/// The config is read once; tunables are not hot-reloaded. An unreadable or
/// invalid config aborts startup. An already inserted [`ConfigLoaded`] (tests)
/// is left alone.
pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
  fn build(&self, app: &mut App) {
    if app.world().contains_resource::<ConfigLoaded>() {
      return;
    }
    let config = load_config_sync();
    app.insert_resource(config);
  }
}

fn load_config_sync() -> ConfigLoaded {
  let config = match read_config() {
    Ok(config) => config,
    Err(err) => panic!("Invalid game config ({}): {}", CONFIG_PATH, err),
  };
  info!(
    "Loaded config: {} platforms, {} checkpoints, {} springs, {} hazards",
    config.level.platforms.len(),
    config.level.checkpoints.len(),
    config.level.springs.len(),
    config.level.hazards.len()
  );
  ConfigLoaded::from(config)
}

fn read_config() -> Result<GameConfig, ConfigError> {
  // WASM: embed config at compile time
  #[cfg(target_family = "wasm")]
  let config_str = include_str!("../../assets/config/game.config.toml").to_string();
  #[cfg(not(target_family = "wasm"))]
  let config_str = {
    // Fall back to the crate directory when launched from the workspace root
    let local = std::path::Path::new(CONFIG_PATH);
    let path = if local.exists() {
      local.to_path_buf()
    } else {
      std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(CONFIG_PATH)
    };
    std::fs::read_to_string(path).map_err(ConfigError::Io)?
  };

  GameConfig::from_toml_str(&config_str)
}
