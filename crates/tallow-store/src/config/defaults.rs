//! Default configuration values

use super::schema::*;
use std::path::PathBuf;
use tallow_protocol::transfer::chunking;

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            download_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
            auto_accept_trusted: false,
            chunk_size: chunking::CHUNK_SIZE,
            high_water_mark: chunking::HIGH_WATER_MARK,
            low_water_mark: chunking::LOW_WATER_MARK,
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            signaling_url: "wss://relay.tallow.app".to_string(),
            slow_threshold_secs: 4,
            relay_fallback_threshold_secs: 8,
            idle_timeout_secs: 2,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "auto".to_string(),
            show_notifications: true,
            language: "en".to_string(),
        }
    }
}
