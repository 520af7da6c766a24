//! Peer connection manager for Tallow
//!
//! Everything a Rust host adapter needs beyond the wire protocol itself:
//! the signaling WebSocket client, perfect-negotiation role assignment and
//! connection-state tracking, reconnect backoff, and relay-mode data
//! forwarding over the signaling socket. Direct peer transport (the
//! `RTCPeerConnection` data channel) is native-browser and driven from
//! `tallow-web`, not from this crate.
//!
//! `signaling`/`relay` dial a real TCP-backed WebSocket via
//! `tokio-tungstenite`, so they're native-only: `tallow-web` talks to the
//! room server through the browser's own `WebSocket` binding instead.
//! `pcm`'s negotiation/connection state machines have no transport
//! dependency of their own and are the half of this crate `tallow-web`
//! actually links against.

#![forbid(unsafe_code)]

pub mod error;
pub mod pcm;
#[cfg(not(target_arch = "wasm32"))]
pub mod relay;
#[cfg(not(target_arch = "wasm32"))]
pub mod signaling;

pub use error::NetworkError;

/// Result type for network operations
pub type Result<T> = std::result::Result<T, NetworkError>;
