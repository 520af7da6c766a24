//! Wasm-bindgen wrapper over the transfer pipelines
//!
//! `tallow_protocol::transfer::{SendPipeline, ReceivePipeline}` already
//! hold their data in memory and never touch the filesystem directly — a
//! browser reading a `File`/`Blob` into a `Vec<u8>` and a CLI reading from
//! disk drive the exact same state machine. This module is a thin
//! wasm-bindgen skin over both, encoding their `DataFrame` output with
//! [`crate::codec::encode_to_bytes`] for `RtcDataChannel.send`.

use tallow_protocol::ids::TransferId;
use tallow_protocol::transfer::metadata::TransferMode;
use tallow_protocol::transfer::state_machine::CancelReason;
use tallow_protocol::transfer::{ReceivePipeline, SendPipeline};
use wasm_bindgen::prelude::*;

fn parse_transfer_id(bytes: &[u8]) -> Result<TransferId, JsValue> {
    let arr: [u8; 16] = bytes
        .try_into()
        .map_err(|_| JsValue::from_str("transfer_id must be exactly 16 bytes"))?;
    Ok(TransferId(arr))
}

fn parse_mode(relay: bool) -> TransferMode {
    if relay {
        TransferMode::Relay
    } else {
        TransferMode::P2p
    }
}

fn parse_session_key(bytes: Option<Vec<u8>>) -> Result<Option<[u8; 32]>, JsValue> {
    match bytes {
        Some(b) => Ok(Some(b.try_into().map_err(|_| JsValue::from_str("session_key must be exactly 32 bytes"))?)),
        None => Ok(None),
    }
}

/// Sender side of one file transfer, wrapping [`SendPipeline`].
#[wasm_bindgen]
pub struct WasmSendTransfer {
    inner: SendPipeline,
}

#[wasm_bindgen]
impl WasmSendTransfer {
    /// * `transfer_id`  - 16-byte transfer identifier
    /// * `data`         - entire file's bytes, read into memory by the caller
    /// * `relay`        - whether this transfer runs over relay mode
    /// * `session_key`  - required (32 bytes) when `relay` is true
    #[wasm_bindgen(constructor)]
    pub fn new(transfer_id: &[u8], data: Vec<u8>, relay: bool, session_key: Option<Vec<u8>>) -> Result<WasmSendTransfer, JsValue> {
        let tid = parse_transfer_id(transfer_id)?;
        let key = parse_session_key(session_key)?;
        Ok(WasmSendTransfer {
            inner: SendPipeline::new(tid, data, parse_mode(relay), key),
        })
    }

    /// File metadata for the `file-request` envelope sent before streaming
    /// begins — `{name, size, totalChunks}`.
    pub fn metadata(&self, name: String) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.metadata(name)).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Accept the receiver's `file-response`, unblocking `start_streaming`.
    pub fn accept(&mut self) -> Result<(), JsValue> {
        self.inner.accept().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Produce the `file-start` frame and move to the streaming state.
    #[wasm_bindgen(js_name = "startStreaming")]
    pub fn start_streaming(&mut self, name: String) -> Result<Vec<u8>, JsValue> {
        let frame = self.inner.start_streaming(name).map_err(|e| JsValue::from_str(&e.to_string()))?;
        crate::codec::encode_to_bytes(frame)
    }

    /// Produce the next `chunk` frame, or `null` once every chunk has been sent.
    #[wasm_bindgen(js_name = "nextChunk")]
    pub fn next_chunk(&mut self) -> Result<JsValue, JsValue> {
        match self.inner.next_chunk().map_err(|e| JsValue::from_str(&e.to_string()))? {
            Some(frame) => crate::codec::encode_to_bytes(frame).map(|bytes| js_sys::Uint8Array::from(bytes.as_slice()).into()),
            None => Ok(JsValue::NULL),
        }
    }

    /// Whether the outbound buffer has crossed the high-water mark and the
    /// caller should pause reading more file bytes until it drains.
    #[wasm_bindgen(js_name = "shouldPause")]
    pub fn should_pause(&self, currently_paused: bool) -> bool {
        self.inner.should_pause(currently_paused)
    }

    /// Record that `n` buffered bytes were acknowledged, draining the
    /// high-water-mark counter.
    #[wasm_bindgen(js_name = "markFlushed")]
    pub fn mark_flushed(&mut self, n: u32) {
        self.inner.mark_flushed(n as usize)
    }

    /// Produce the final `file-end` frame once all chunks are sent.
    pub fn finish(&mut self) -> Result<Vec<u8>, JsValue> {
        let frame = self.inner.finish().map_err(|e| JsValue::from_str(&e.to_string()))?;
        crate::codec::encode_to_bytes(frame)
    }

    /// Abort the transfer, producing a `cancel` frame with `reason = 0`
    /// (user), `1` (peer left), or `2` (error).
    pub fn cancel(&mut self, reason: u8) -> Result<Vec<u8>, JsValue> {
        let reason = match reason {
            0 => CancelReason::User,
            1 => CancelReason::PeerLeft,
            _ => CancelReason::Error,
        };
        let frame = self.inner.cancel(reason).map_err(|e| JsValue::from_str(&e.to_string()))?;
        crate::codec::encode_to_bytes(frame)
    }
}

/// Receiver side of one file transfer, wrapping [`ReceivePipeline`].
///
/// `output_dir` has no real filesystem meaning in the browser; pass a
/// placeholder (e.g. `"/"`) — it only anchors the anti-traversal check on
/// the sanitized filename, which still matters for a name that will be
/// offered to the user via `a[download]` or the File System Access API.
#[wasm_bindgen]
pub struct WasmReceiveTransfer {
    transfer_id: TransferId,
    inner: ReceivePipeline,
}

#[wasm_bindgen]
impl WasmReceiveTransfer {
    #[wasm_bindgen(constructor)]
    pub fn new(transfer_id: &[u8], output_dir: &str, relay: bool, session_key: Option<Vec<u8>>) -> Result<WasmReceiveTransfer, JsValue> {
        let tid = parse_transfer_id(transfer_id)?;
        let key = parse_session_key(session_key)?;
        Ok(WasmReceiveTransfer {
            transfer_id: tid,
            inner: ReceivePipeline::new(tid, output_dir, parse_mode(relay), key),
        })
    }

    /// Record that the local user accepted the incoming `file-request`.
    pub fn accept(&mut self) -> Result<(), JsValue> {
        self.inner.accept().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Record that the local user declined the incoming `file-request`.
    pub fn decline(&mut self) -> Result<(), JsValue> {
        self.inner.decline().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The sanitized destination filename, once `file-start` has been processed.
    #[wasm_bindgen(js_name = "destPath")]
    pub fn dest_path(&self) -> Option<String> {
        self.inner.dest_path().map(|p| p.display().to_string())
    }

    /// Feed one decoded data-channel frame (see [`crate::codec::decode_frame`]).
    ///
    /// Returns the complete file's bytes once the `file-end` frame's digest
    /// checks out, `null` otherwise.
    #[wasm_bindgen(js_name = "handleFrame")]
    pub fn handle_frame(&mut self, kind: u8, seq: u32, payload: &[u8]) -> Result<JsValue, JsValue> {
        let kind = tallow_protocol::wire::codec::FrameKind::from_byte(kind)
            .ok_or_else(|| JsValue::from_str(&format!("unknown frame kind {kind:#x}")))?;
        let frame = tallow_protocol::wire::codec::DataFrame::new(kind, self.transfer_id, seq, payload.to_vec());
        match self.inner.handle_frame(frame).map_err(|e| JsValue::from_str(&e.to_string()))? {
            Some(bytes) => Ok(js_sys::Uint8Array::from(bytes.as_slice()).into()),
            None => Ok(JsValue::NULL),
        }
    }
}
