//! Glue between the frame codec and the relay-mode encrypted channel
//!
//! Every frame this CLI sends or receives travels over the signaling
//! socket's `relay-data` forwarding: encode as a [`DataFrame`], AEAD-seal
//! the whole encoded frame with the pair's session key, wrap in a
//! `relay-data` envelope. `FileRequestData.transfer_mode` still tells the
//! peer `TransferModeWire::Relay`, but `SendPipeline`/`ReceivePipeline`
//! internally run as plain `TransferMode::P2p` — there's no second
//! encryption layer inside the pipeline, only this one around the frame
//! as a whole.

use bytes::BytesMut;
use tallow_net::error::NetworkError;
use tallow_net::relay::channel::RelayChannel;
use tallow_protocol::ids::{PeerId, RoomCode, TransferId};
use tallow_protocol::wire::codec::{DataFrame, FrameCodec};
use tallow_protocol::wire::messages::RelayEnvelope;
use tallow_protocol::ProtocolError;
use tokio_util::codec::{Decoder, Encoder};

use crate::session::RoomSession;

/// Encode `frame` and send it to `peer`, relay-encrypted with `session_key`.
pub async fn send_frame(
    room: &mut RoomSession,
    peer: &PeerId,
    session_key: &[u8; 32],
    frame: DataFrame,
) -> Result<(), NetworkError> {
    let transfer_id = frame.transfer_id;
    let seq = frame.seq;
    let mut buf = BytesMut::new();
    FrameCodec::new().encode(frame, &mut buf).map_err(NetworkError::Protocol)?;

    let mut channel = RelayChannel::new(&mut room.signaling, peer.clone(), *session_key);
    channel.send_frame(transfer_id, seq, &buf).await
}

/// Decrypt a `relay-data` envelope and decode it back into a [`DataFrame`].
///
/// `transfer_id` must be whatever the sender encrypted with — known ahead
/// of time from the `file-request`/`file-response` round trip for file
/// transfers, or from [`chat_transfer_id`] for chat.
pub fn decode_frame(
    room: &mut RoomSession,
    peer: &PeerId,
    session_key: &[u8; 32],
    transfer_id: TransferId,
    envelope: &RelayEnvelope,
) -> Result<DataFrame, NetworkError> {
    let channel = RelayChannel::new(&mut room.signaling, peer.clone(), *session_key);
    let raw = channel.decode_frame(transfer_id, envelope)?;

    let mut buf = BytesMut::from(&raw[..]);
    FrameCodec::new()
        .decode(&mut buf)
        .map_err(NetworkError::Protocol)?
        .ok_or_else(|| NetworkError::Protocol(ProtocolError::InvalidFrame("relay-data envelope held a truncated frame".into())))
}

/// Deterministic per-direction transfer id for chat frames.
///
/// Both peers derive this independently from the room code and sender/
/// recipient ids, so chat needs no id-announcing handshake the way file
/// transfers do. Direction matters: `from`/`to` order keeps each side's
/// outbound sequence counter on its own nonce domain, so two peers typing
/// at once never reuse a `(transfer_id, seq)` pair.
pub fn chat_transfer_id(room_code: &RoomCode, from: &PeerId, to: &PeerId) -> TransferId {
    let mut input = Vec::new();
    input.extend_from_slice(b"tallow-chat-v1|");
    input.extend_from_slice(room_code.0.as_bytes());
    input.push(b'|');
    input.extend_from_slice(from.0.as_bytes());
    input.push(b'|');
    input.extend_from_slice(to.0.as_bytes());

    let digest = tallow_crypto::hash::blake3::hash(&input);
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    TransferId(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_transfer_id_is_direction_sensitive() {
        let room = RoomCode("ABCD".to_string());
        let alice = PeerId::from("alice");
        let bob = PeerId::from("bob");
        assert_ne!(chat_transfer_id(&room, &alice, &bob), chat_transfer_id(&room, &bob, &alice));
    }

    #[test]
    fn chat_transfer_id_is_deterministic() {
        let room = RoomCode("ABCD".to_string());
        let alice = PeerId::from("alice");
        let bob = PeerId::from("bob");
        assert_eq!(chat_transfer_id(&room, &alice, &bob), chat_transfer_id(&room, &alice, &bob));
    }
}
