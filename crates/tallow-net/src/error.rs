//! Network error types

use thiserror::Error;

/// Network layer errors
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The signaling WebSocket failed to connect to the room server.
    #[error("signaling connection failed: {0}")]
    SignalingConnect(String),

    /// The signaling WebSocket closed, gracefully or not.
    #[error("signaling connection closed")]
    SignalingClosed,

    /// A send/receive over signaling or the relay channel timed out.
    #[error("operation timed out")]
    Timeout,

    /// Perfect negotiation failed to converge on a connection.
    #[error("negotiation failed: {0}")]
    NegotiationFailed(String),

    /// The room server rejected or errored on a relay-data frame.
    #[error("relay error: {0}")]
    RelayError(String),

    /// The room server rejected the join (bad password, full, etc).
    #[error("join rejected: {0}")]
    JoinRejected(String),

    /// Protocol-layer error surfaced while encoding/decoding signaling or
    /// relay traffic.
    #[error(transparent)]
    Protocol(#[from] tallow_protocol::ProtocolError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl NetworkError {
    /// Whether retrying after backoff is worth attempting for this error.
    ///
    /// Join rejections and protocol errors are never transient; everything
    /// else is a connectivity blip worth another attempt.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::JoinRejected(_) | Self::Protocol(_))
    }
}
