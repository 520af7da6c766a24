//! Configuration file loading and saving

use super::TallowConfig;
use crate::persistence::paths;
use crate::{Result, StoreError};
use std::path::PathBuf;

/// Load configuration from the platform config file, falling back to
/// defaults if no file exists yet.
pub fn load_config() -> Result<TallowConfig> {
    let path = config_path();
    if !path.exists() {
        return Ok(TallowConfig::default());
    }
    let contents = std::fs::read_to_string(&path)?;
    toml::from_str(&contents).map_err(StoreError::from)
}

/// Save configuration to the platform config file, creating parent
/// directories as needed.
pub fn save_config(config: &TallowConfig) -> Result<()> {
    paths::ensure_dirs()?;
    let contents = toml::to_string_pretty(config).map_err(StoreError::from)?;
    std::fs::write(config_path(), contents)?;
    Ok(())
}

/// Path to the configuration file.
pub fn config_path() -> PathBuf {
    paths::config_file()
}
