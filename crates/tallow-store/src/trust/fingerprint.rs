//! Non-cryptographic device fingerprints
//!
//! A `Fingerprint` is a short, stable label a user can glance at to tell
//! two trusted-device entries apart ("the other laptop" vs "the phone").
//! It is derived from the peer's self-reported name, device class, and
//! browser info — the same fields every peer already broadcasts in its
//! roster entry — never from a cryptographic key. It carries no security
//! property: two peers with identical name/device/browser strings collide,
//! and nothing here detects that. Anywhere a join decision needs to be
//! secure, it goes through the room password hash instead.

use tallow_protocol::wire::messages::DeviceClass;

/// Emoji set for rendering a fingerprint (64 entries = 6 bits each).
const FINGERPRINT_EMOJIS: &[&str] = &[
    "🔐", "🌟", "🔥", "🌊", "🎯", "🚀", "💎", "🌈", "🦊", "🐻", "🦅", "🐬", "🌸", "🍀", "🌙", "⚡",
    "🎵", "🎨", "🏔", "🌋", "🦋", "🐝", "🌺", "🍁", "❄", "☀", "🌻", "🍄", "🦈", "🐙", "🦀", "🌵",
    "🎭", "🎪", "🎲", "🎸", "🏴", "⛵", "🗝", "🔮", "🎃", "🌾", "🍇", "🫐", "🥝", "🍊", "🌰", "🥨",
    "🦉", "🐺", "🦁", "🐸", "🦆", "🦜", "🐢", "🦎", "🏖", "🏕", "🎠", "🎡", "⛰", "🗻", "🏜", "🌏",
];

/// A 32-bit, display-only fingerprint for a trusted-device record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub [u8; 4]);

impl Fingerprint {
    /// Derive a fingerprint from a peer's roster fields.
    pub fn derive(name: &str, device_type: DeviceClass, browser_info: Option<&str>) -> Self {
        let mut input = String::with_capacity(name.len() + 16);
        input.push_str(name);
        input.push('|');
        input.push_str(match device_type {
            DeviceClass::Desktop => "desktop",
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
        });
        input.push('|');
        input.push_str(browser_info.unwrap_or(""));

        let hash = tallow_crypto::blake3::hash(input.as_bytes());
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&hash[..4]);
        Self(bytes)
    }

    /// Render as a colon-separated hex string.
    pub fn hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(":")
    }

    /// Render as a pair of emojis for quick visual comparison.
    pub fn emoji(&self) -> String {
        self.0
            .iter()
            .take(2)
            .map(|b| FINGERPRINT_EMOJIS[*b as usize % FINGERPRINT_EMOJIS.len()])
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_input() {
        let a = Fingerprint::derive("alice-laptop", DeviceClass::Desktop, Some("Firefox"));
        let b = Fingerprint::derive("alice-laptop", DeviceClass::Desktop, Some("Firefox"));
        assert_eq!(a, b);
    }

    #[test]
    fn differs_on_device_class() {
        let a = Fingerprint::derive("alice", DeviceClass::Desktop, None);
        let b = Fingerprint::derive("alice", DeviceClass::Mobile, None);
        assert_ne!(a, b);
    }

    #[test]
    fn hex_is_eleven_chars() {
        let fp = Fingerprint::derive("alice", DeviceClass::Desktop, None);
        assert_eq!(fp.hex().len(), 11); // 4 bytes * 2 hex chars + 3 colons
    }

    #[test]
    fn emoji_renders_two_glyphs() {
        let fp = Fingerprint::derive("alice", DeviceClass::Desktop, None);
        assert_eq!(fp.emoji().split(' ').count(), 2);
    }
}
