//! Peer connection manager
//!
//! Coordinates what a Rust host adapter is responsible for in a
//! browser-WebRTC system: deciding the polite/impolite negotiation role for
//! each peer pair, and tracking connection state (and its fallback timers)
//! once negotiation starts. The actual `RTCPeerConnection`/ICE machinery
//! lives in the browser and is driven from `tallow-web`'s WASM bindings.

pub mod connection;
pub mod host_adapter;
pub mod negotiation;
#[cfg(not(target_arch = "wasm32"))]
pub mod reconnect;

pub use connection::{ConnectionState, ConnectionTracker};
pub use host_adapter::HostAdapter;
pub use negotiation::{Negotiation, Role};
#[cfg(not(target_arch = "wasm32"))]
pub use reconnect::ReconnectConfig;
