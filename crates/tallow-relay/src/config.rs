//! Relay server configuration
//!
//! TLS termination is assumed to happen in front of this process (a
//! reverse proxy or load balancer) rather than in-process — a relay whose
//! only job is forwarding already-encrypted bytes gains little from also
//! owning a certificate, and it keeps this crate's dependency surface to
//! exactly what WebSocket + room bookkeeping needs.

use serde::{Deserialize, Serialize};

/// Relay server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// WebSocket bind address, e.g. `"0.0.0.0:4433"`.
    #[serde(default = "default_ws_bind_addr")]
    pub ws_bind_addr: String,
    /// Maximum concurrent connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// Maximum concurrent rooms.
    #[serde(default = "default_max_rooms")]
    pub max_rooms: usize,
    /// Rate limit, requests per second per IP.
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,
    /// Seconds of inactivity before a room is swept.
    #[serde(default = "default_room_timeout")]
    pub room_timeout_secs: u64,
    /// Maximum peers in one room.
    #[serde(default = "default_max_peers_per_room")]
    pub max_peers_per_room: u8,
}

fn default_ws_bind_addr() -> String {
    "0.0.0.0:4433".to_string()
}

fn default_max_connections() -> usize {
    10_000
}

fn default_max_rooms() -> usize {
    5_000
}

fn default_rate_limit() -> u32 {
    100
}

fn default_room_timeout() -> u64 {
    60
}

fn default_max_peers_per_room() -> u8 {
    10
}

impl RelayConfig {
    /// Minimum room timeout, preventing an accidental zero from meaning "never expire".
    const MIN_ROOM_TIMEOUT: u64 = 10;

    /// Clamp configuration values read from a file or CLI flags into sane ranges.
    pub fn validate(&mut self) {
        if self.room_timeout_secs < Self::MIN_ROOM_TIMEOUT {
            self.room_timeout_secs = Self::MIN_ROOM_TIMEOUT;
        }
        self.max_peers_per_room = self.max_peers_per_room.min(20);
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            ws_bind_addr: default_ws_bind_addr(),
            max_connections: default_max_connections(),
            max_rooms: default_max_rooms(),
            rate_limit: default_rate_limit(),
            room_timeout_secs: default_room_timeout(),
            max_peers_per_room: default_max_peers_per_room(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_clamps_too_small_timeout() {
        let mut config = RelayConfig { room_timeout_secs: 1, ..Default::default() };
        config.validate();
        assert_eq!(config.room_timeout_secs, RelayConfig::MIN_ROOM_TIMEOUT);
    }

    #[test]
    fn validate_clamps_excessive_peer_capacity() {
        let mut config = RelayConfig { max_peers_per_room: 255, ..Default::default() };
        config.validate();
        assert_eq!(config.max_peers_per_room, 20);
    }
}
