//! Platform-specific paths
//!
//! All state lives under the platform's standard config/data directories,
//! namespaced under `tallow`, resolved via the `dirs` crate.

use crate::Result;
use std::path::PathBuf;

/// Configuration directory (`~/.config/tallow` on Linux, etc).
pub fn config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("tallow")
}

/// Data directory (`~/.local/share/tallow` on Linux, etc).
pub fn data_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("tallow")
}

/// Path to the configuration file.
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Path to the encrypted trust-store file.
pub fn trust_file() -> PathBuf {
    data_dir().join("trust.kv")
}

/// Create the config and data directories if they don't already exist.
pub fn ensure_dirs() -> Result<()> {
    std::fs::create_dir_all(config_dir())?;
    std::fs::create_dir_all(data_dir())?;
    Ok(())
}
