//! Per-peer-pair key exchange
//!
//! Each connected peer pair exchanges ephemeral X25519 public keys over the
//! `key-exchange` signaling message, then derives a shared [`SessionKey`]
//! via ECDH. This key is only needed for relay-mode AEAD (p2p traffic is
//! already DTLS-protected) but both sides derive it regardless of which
//! mode they end up in, since the mode can change mid-connection.

use tallow_crypto::kem::x25519::X25519PublicKey;
use tallow_crypto::kem::X25519KeyPair;
use zeroize::Zeroize;

/// A derived shared key for one peer pair, used as the relay-mode AEAD key.
pub struct SessionKey {
    key: [u8; 32],
}

impl SessionKey {
    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

impl Drop for SessionKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// One side's ephemeral key-exchange state: holds the local keypair until
/// the peer's public key arrives.
pub struct KeyExchange {
    local: X25519KeyPair,
}

impl KeyExchange {
    /// Generate a fresh ephemeral keypair to offer in a `key-exchange` message.
    pub fn new() -> Self {
        Self {
            local: X25519KeyPair::generate(),
        }
    }

    /// The public key bytes to send in the `key-exchange` message's `publicKey` field.
    pub fn public_bytes(&self) -> [u8; 32] {
        self.local.public_bytes()
    }

    /// Complete the exchange once the peer's public key bytes arrive, deriving
    /// the shared [`SessionKey`] via X25519 ECDH followed by a BLAKE3 KDF step.
    pub fn complete(self, their_public_bytes: &[u8; 32]) -> SessionKey {
        let their_public = X25519PublicKey::from(*their_public_bytes);
        let shared = self.local.diffie_hellman(&their_public);
        let key = tallow_crypto::hash::blake3::derive_key("tallow-relay-session-key-v1", &shared.0);
        SessionKey { key }
    }
}

impl Default for KeyExchange {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_sides_derive_the_same_key() {
        let alice = KeyExchange::new();
        let bob = KeyExchange::new();

        let alice_pub = alice.public_bytes();
        let bob_pub = bob.public_bytes();

        let alice_key = alice.complete(&bob_pub);
        let bob_key = bob.complete(&alice_pub);

        assert_eq!(alice_key.as_bytes(), bob_key.as_bytes());
    }

    #[test]
    fn different_peers_derive_different_keys() {
        let bob_pub = KeyExchange::new().public_bytes();
        let mallory_pub = KeyExchange::new().public_bytes();

        let alice_bob_key = KeyExchange::new().complete(&bob_pub);
        let alice_mallory_key = KeyExchange::new().complete(&mallory_pub);

        assert_ne!(alice_bob_key.as_bytes(), alice_mallory_key.as_bytes());
    }
}
