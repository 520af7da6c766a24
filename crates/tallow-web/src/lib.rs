//! Tallow WebAssembly browser client
//!
//! The browser host adapter for the peer connection manager in
//! `tallow-net`: [`host_adapter::WebHostAdapter`] drives a real
//! `RtcPeerConnection`/`RtcDataChannel` pair the same way the `tallow` CLI's
//! TCP stand-in drives a socket, and [`signaling::WebSignaling`] speaks the
//! same `RelayEnvelope` JSON protocol as `tallow_net::signaling::SignalingClient`
//! over the browser's own `WebSocket` binding instead of `tokio-tungstenite`.
//! Everything above that line — wire framing, chunking, key exchange, chat
//! sanitization — reuses `tallow-protocol` and `tallow-crypto` directly, so
//! the browser and the CLI run identical cryptography and identical wire
//! bytes.
#![forbid(unsafe_code)]

pub mod chat;
pub mod codec;
pub mod crypto;
pub mod host_adapter;
pub mod manifest;
pub mod signaling;
pub mod transfer;

use wasm_bindgen::prelude::*;

/// Initialize the WASM module. Called automatically on load.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}
