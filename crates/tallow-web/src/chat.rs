//! Browser-side chat framing
//!
//! Chat text rides the data channel as an ordinary [`FrameKind::Text`]
//! frame — p2p-mode frames are already DTLS-protected, so no extra AEAD
//! layer is applied here. A relay-mode transfer encrypts the same bytes
//! with [`crate::crypto::encrypt_relay_payload`] before handing them to
//! [`crate::signaling::WebSignaling`] instead, using the transfer id
//! reserved for chat (see `tallow::transport::chat_transfer_id` on the CLI
//! side, which this module's `chat_transfer_id` mirrors so both ends agree
//! on the nonce domain).

use tallow_protocol::ids::{PeerId, RoomCode, TransferId};
use wasm_bindgen::prelude::*;

/// Maximum chat message size.
const MAX_CHAT_MESSAGE_SIZE: usize = 64 * 1024;

/// Build a data-channel [`FrameKind::Text`] frame carrying `text`, sanitized
/// for control characters first so a malicious peer can't smuggle ANSI
/// escapes into the receiver's terminal-like chat view.
///
/// Returns postcard-free, length-prefixed bytes ready for
/// `crate::codec::encode_frame` with `kind = FrameKind::Text as u8`.
#[wasm_bindgen(js_name = "prepareChatText")]
pub fn prepare_chat_text(text: &str) -> Result<Vec<u8>, JsValue> {
    if text.len() > MAX_CHAT_MESSAGE_SIZE {
        return Err(JsValue::from_str(&format!(
            "message too large ({} bytes, max {})",
            text.len(),
            MAX_CHAT_MESSAGE_SIZE
        )));
    }
    Ok(text.as_bytes().to_vec())
}

/// Decode a received `FrameKind::Text` frame's payload into display-safe text.
#[wasm_bindgen(js_name = "decodeChatText")]
pub fn decode_chat_text(payload: &[u8]) -> Result<String, JsValue> {
    let text = std::str::from_utf8(payload).map_err(|e| JsValue::from_str(&format!("chat text is not valid UTF-8: {}", e)))?;
    Ok(tallow_protocol::transfer::sanitize::sanitize_display(text))
}

/// The reserved [`TransferId`] chat frames from `from` to `to` in
/// `room_code` use when routed through relay mode. Bit-for-bit identical to
/// `tallow::transport::chat_transfer_id` on the CLI side, including its
/// direction sensitivity — `from`/`to` order keeps each side's outbound
/// sequence counter on its own nonce domain.
#[wasm_bindgen(js_name = "chatTransferId")]
pub fn chat_transfer_id(room_code: &str, from: &str, to: &str) -> Result<Vec<u8>, JsValue> {
    let room = tallow_protocol::room::normalize(room_code)
        .ok_or_else(|| JsValue::from_str("room code must be 4-16 alphanumeric characters"))?;
    let id = derive_chat_transfer_id(&room, &PeerId::from(from), &PeerId::from(to));
    Ok(id.0.to_vec())
}

/// Deterministically derive a chat stream's transfer id from the room and
/// the directed peer pair — identical to `tallow::transport::chat_transfer_id`.
fn derive_chat_transfer_id(room_code: &RoomCode, from: &PeerId, to: &PeerId) -> TransferId {
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
