//! Configuration schema

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main Tallow client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallowConfig {
    /// Transfer behavior settings.
    #[serde(default)]
    pub transfer: TransferConfig,
    /// Signaling/connection settings.
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// UI settings.
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for TallowConfig {
    fn default() -> Self {
        Self {
            transfer: TransferConfig::default(),
            connection: ConnectionConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

/// Transfer behavior configuration.
///
/// `chunk_size`/`high_water_mark`/`low_water_mark` default to the wire
/// protocol's fixed values (`tallow_protocol::transfer::chunking`) but are
/// exposed here as overridable tunables for non-default deployments, the
/// same way the relay's per-frame payload cap is a constructor parameter
/// rather than a hardcoded constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Default download directory for incoming files.
    pub download_dir: PathBuf,
    /// Auto-accept incoming transfers from `Trusted`/`Verified` peers.
    pub auto_accept_trusted: bool,
    /// File payload chunk size, in bytes.
    pub chunk_size: usize,
    /// Outbound buffer high-water mark, in bytes.
    pub high_water_mark: usize,
    /// Outbound buffer low-water mark, in bytes.
    pub low_water_mark: usize,
}

/// Signaling and peer-connection timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// WebSocket URL of the room server to connect to.
    pub signaling_url: String,
    /// Seconds spent connecting before a connection is considered "slow".
    pub slow_threshold_secs: u64,
    /// Seconds spent connecting before falling back to relay mode.
    pub relay_fallback_threshold_secs: u64,
    /// Seconds of silence before an open connection is considered idle.
    pub idle_timeout_secs: u64,
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme (dark/light/auto).
    pub theme: String,
    /// Show transfer notifications.
    pub show_notifications: bool,
    /// Language code.
    pub language: String,
}
