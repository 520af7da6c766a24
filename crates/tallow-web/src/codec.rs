//! Wire framing bridge between JavaScript and the real Tallow wire protocol
//!
//! Two distinct wire formats cross this boundary: the binary data-channel
//! [`tallow_protocol::wire::codec::DataFrame`] (fixed 25-byte header, sent
//! straight over the `RtcDataChannel`), and the JSON
//! [`tallow_protocol::wire::messages::RelayEnvelope`] spoken with the room
//! server over [`crate::signaling::WebSignaling`]. Neither format is
//! specific to this crate — both are defined once in `tallow-protocol` and
//! encoded/decoded identically on the CLI side.

use bytes::BytesMut;
use tallow_protocol::wire::codec::{DataFrame, FrameCodec, FrameKind};
use tokio_util::codec::{Decoder, Encoder};
use wasm_bindgen::prelude::*;

/// Encode one data-channel frame, ready to hand to
/// `RtcDataChannel.send(Uint8Array)`.
///
/// * `kind`        - one of the [`FrameKind`] discriminants (`0x01`..`0x05`)
/// * `transfer_id` - 16-byte transfer identifier
/// * `seq`         - frame sequence number within this transfer's direction
/// * `payload`     - frame payload; meaning depends on `kind`
#[wasm_bindgen(js_name = "encodeFrame")]
pub fn encode_frame(kind: u8, transfer_id: &[u8], seq: u32, payload: &[u8]) -> Result<Vec<u8>, JsValue> {
    let kind = FrameKind::from_byte(kind).ok_or_else(|| JsValue::from_str(&format!("unknown frame kind {kind:#x}")))?;
    let tid: [u8; 16] = transfer_id
        .try_into()
        .map_err(|_| JsValue::from_str("transfer_id must be exactly 16 bytes"))?;

    let frame = DataFrame::new(kind, tallow_protocol::ids::TransferId(tid), seq, payload.to_vec());
    let mut buf = BytesMut::new();
    FrameCodec::new()
        .encode(frame, &mut buf)
        .map_err(|e| JsValue::from_str(&format!("encode frame: {}", e)))?;
    Ok(buf.to_vec())
}

/// Decode one data-channel frame received from `RtcDataChannel.onmessage`.
///
/// Returns `null` if `bytes` doesn't yet contain a complete frame (the
/// caller is expected to have already reassembled one `ArrayBuffer` per
/// `send`, so in practice this only happens on a malformed peer).
#[wasm_bindgen(js_name = "decodeFrame")]
pub fn decode_frame(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let mut buf = BytesMut::from(bytes);
    let frame = FrameCodec::new()
        .decode(&mut buf)
        .map_err(|e| JsValue::from_str(&format!("decode frame: {}", e)))?;
    match frame {
        Some(frame) => serde_wasm_bindgen::to_value(&DecodedFrame::from(frame))
            .map_err(|e| JsValue::from_str(&format!("serialize frame: {}", e))),
        None => Ok(JsValue::NULL),
    }
}

/// JS-friendly mirror of [`DataFrame`] (which has no `Serialize` impl of
/// its own, since the CLI only ever needs `FrameCodec`'s binary form).
#[derive(serde::Serialize)]
struct DecodedFrame {
    kind: u8,
    transfer_id: Vec<u8>,
    seq: u32,
    payload: Vec<u8>,
}

impl From<DataFrame> for DecodedFrame {
    fn from(frame: DataFrame) -> Self {
        Self {
            kind: frame.kind as u8,
            transfer_id: frame.transfer_id.0.to_vec(),
            seq: frame.seq,
            payload: frame.payload,
        }
    }
}

/// Encode a [`DataFrame`] already built by a `SendPipeline`/`ReceivePipeline`
/// call into bytes for `RtcDataChannel.send`. Shared with [`crate::transfer`]
/// so pipeline output doesn't need a second encoding path.
pub(crate) fn encode_to_bytes(frame: DataFrame) -> Result<Vec<u8>, JsValue> {
    let mut buf = BytesMut::new();
    FrameCodec::new()
        .encode(frame, &mut buf)
        .map_err(|e| JsValue::from_str(&format!("encode frame: {}", e)))?;
    Ok(buf.to_vec())
}

/// Strip ANSI escape sequences and control characters from display text.
///
/// Apply to any string that came from a peer before showing it to the user.
#[wasm_bindgen(js_name = "sanitizeDisplayText")]
pub fn sanitize_display_text(input: &str) -> String {
    tallow_protocol::transfer::sanitize::sanitize_display(input)
}
