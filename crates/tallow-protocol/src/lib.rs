//! Shared wire protocol and transfer engine
//!
//! Defines the data-channel frame codec and room-server signaling message
//! shapes, the sender/receiver transfer state machines and pipelines,
//! per-peer key exchange, and room code/password handling. Used by both the
//! peer connection manager and any host adapter that needs to speak the
//! wire format directly.

#![forbid(unsafe_code)]

pub mod error;
pub mod ids;
pub mod kex;
pub mod multi;
pub mod room;
pub mod transfer;
pub mod wire;

pub use error::ProtocolError;

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;
