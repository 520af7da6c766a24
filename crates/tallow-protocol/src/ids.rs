//! Identifiers shared across the room, signaling, and transfer layers
//!
//! `PeerId` and `TransferId` are opaque wire identifiers. `PeerId` derives
//! `Ord` from `String`, which compares as raw UTF-8 bytes rather than
//! locale collation — the total order perfect negotiation's polite/impolite
//! split needs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A peer's identifier, assigned by the room server on join.
///
/// Backed by a UUIDv4 string. Comparisons are byte-wise (`String`'s `Ord`),
/// not collation-aware — this is what perfect negotiation's role decision
/// relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeerId(pub String);

impl PeerId {
    /// Generate a new random peer id (UUIDv4-shaped, not a real UUID dependency).
    pub fn generate() -> Self {
        let bytes: [u8; 16] = rand::random();
        Self(format_uuid_v4(bytes))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PeerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A transfer's identifier: 16 bytes, rendered as a UUID on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransferId(pub [u8; 16]);

impl TransferId {
    /// Generate a new random transfer id.
    pub fn generate() -> Self {
        Self(rand::random())
    }

    /// Render as a UUID-shaped string for JSON payloads (`file-id` field).
    pub fn to_uuid_string(self) -> String {
        format_uuid_v4(self.0)
    }

    /// Parse a UUID-shaped string back into a `TransferId`.
    pub fn from_uuid_string(s: &str) -> Option<Self> {
        let hex: String = s.chars().filter(|c| *c != '-').collect();
        if hex.len() != 32 {
            return None;
        }
        let mut bytes = [0u8; 16];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk).ok()?;
            bytes[i] = u8::from_str_radix(pair, 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uuid_string())
    }
}

fn format_uuid_v4(b: [u8; 16]) -> String {
    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7], b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]
    )
}

/// A room code: 4-16 alphanumeric characters, stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoomCode(pub String);

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_id_orders_by_bytes_not_locale() {
        let a = PeerId::from("AAAA");
        let b = PeerId::from("aaaa");
        // Uppercase ASCII sorts before lowercase in byte order.
        assert!(a < b);
    }

    #[test]
    fn transfer_id_roundtrips_through_uuid_string() {
        let id = TransferId::generate();
        let s = id.to_uuid_string();
        assert_eq!(TransferId::from_uuid_string(&s), Some(id));
    }

    #[test]
    fn transfer_id_uuid_string_has_dashes_in_right_places() {
        let id = TransferId([0xab; 16]);
        let s = id.to_uuid_string();
        assert_eq!(s.len(), 36);
        assert_eq!(s.chars().filter(|c| *c == '-').count(), 4);
    }
}
