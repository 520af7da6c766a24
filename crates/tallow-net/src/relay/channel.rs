//! Relay-mode data forwarding over the signaling socket
//!
//! When a peer pair can't establish a direct data channel (or
//! [`crate::pcm::connection::ConnectionTracker`] falls back after the
//! fallback timer), transfer chunks are wrapped as base64 in a `relay-data`
//! [`RelayEnvelope`] and forwarded by the room server to the named peer.
//! The server never sees plaintext: payloads are AES-256-GCM-encrypted with
//! the pair's session key before this module ever touches them.

use crate::signaling::SignalingClient;
use crate::{NetworkError, Result};
use base64::Engine;
use tallow_protocol::ids::{PeerId, TransferId};
use tallow_protocol::transfer::crypto::{decrypt_relay_payload, encrypt_relay_payload};
use tallow_protocol::wire::messages::{RelayDataPayload, RelayEnvelope};

/// Forwards transfer-engine frames to one peer through relay-data envelopes
/// over an already-connected [`SignalingClient`].
pub struct RelayChannel<'a> {
    signaling: &'a mut SignalingClient,
    peer: PeerId,
    session_key: [u8; 32],
}

impl<'a> RelayChannel<'a> {
    /// Build a channel for `peer`, encrypting with `session_key`.
    pub fn new(signaling: &'a mut SignalingClient, peer: PeerId, session_key: [u8; 32]) -> Self {
        Self {
            signaling,
            peer,
            session_key,
        }
    }

    /// Encrypt and send one data-channel frame's bytes as a relay-data envelope.
    pub async fn send_frame(&mut self, transfer_id: TransferId, seq: u32, frame_bytes: &[u8]) -> Result<()> {
        let ciphertext = encrypt_relay_payload(&self.session_key, transfer_id, seq, frame_bytes)
            .map_err(NetworkError::Protocol)?;
        let payload = RelayDataPayload {
            seq,
            payload_b64: base64::engine::general_purpose::STANDARD.encode(ciphertext),
            enc: true,
        };
        let data = serde_json::to_value(&payload).map_err(|e| NetworkError::RelayError(e.to_string()))?;
        let envelope = RelayEnvelope {
            kind: "relay-data".to_string(),
            from: None,
            to: Some(self.peer.clone()),
            data: Some(data),
        };
        self.signaling.send(&envelope).await
    }

    /// Decrypt a received relay-data envelope's payload back into frame bytes.
    ///
    /// `transfer_id` must be the caller's expected transfer, since the
    /// envelope itself carries only `seq`, not which transfer it belongs to
    /// (the surrounding data-channel frame header carries that once
    /// decrypted — the relay layer just forwards opaque ciphertext).
    pub fn decode_frame(&self, transfer_id: TransferId, envelope: &RelayEnvelope) -> Result<Vec<u8>> {
        let data = envelope
            .data
            .as_ref()
            .ok_or_else(|| NetworkError::RelayError("missing relay-data payload".to_string()))?;
        let payload: RelayDataPayload =
            serde_json::from_value(data.clone()).map_err(|e| NetworkError::RelayError(e.to_string()))?;
        let ciphertext = base64::engine::general_purpose::STANDARD
            .decode(&payload.payload_b64)
            .map_err(|e| NetworkError::RelayError(e.to_string()))?;
        if !payload.enc {
            return Ok(ciphertext);
        }
        decrypt_relay_payload(&self.session_key, transfer_id, payload.seq, &ciphertext)
            .map_err(NetworkError::Protocol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_envelope_without_data() {
        let mut signaling = SignalingClient::new("wss://example.invalid/ws".to_string());
        let channel = RelayChannel::new(&mut signaling, PeerId::from("peer-a"), [0u8; 32]);
        let envelope = RelayEnvelope {
            kind: "relay-data".to_string(),
            from: None,
            to: None,
            data: None,
        };
        assert!(channel.decode_frame(TransferId::generate(), &envelope).is_err());
    }

    #[test]
    fn encrypted_payload_roundtrips_through_decode() {
        let key = [9u8; 32];
        let id = TransferId::generate();
        let ciphertext = encrypt_relay_payload(&key, id, 2, b"frame bytes").unwrap();
        let payload = RelayDataPayload {
            seq: 2,
            payload_b64: base64::engine::general_purpose::STANDARD.encode(ciphertext),
            enc: true,
        };
        let envelope = RelayEnvelope {
            kind: "relay-data".to_string(),
            from: None,
            to: None,
            data: Some(serde_json::to_value(&payload).unwrap()),
        };
        let mut signaling = SignalingClient::new("wss://example.invalid/ws".to_string());
        let channel = RelayChannel::new(&mut signaling, PeerId::from("peer-a"), key);
        let decoded = channel.decode_frame(id, &envelope).unwrap();
        assert_eq!(decoded, b"frame bytes");
    }
}
