//! Protocol-layer errors
//!
//! These are error *kinds*, not a type hierarchy: the wire never carries a
//! backtrace or a typed cause chain, only one of the reasons below, plus a
//! room code/peer id/transfer id for context.

use crate::transfer::state_machine::CancelReason;
use thiserror::Error;

/// Errors raised while parsing, encoding, or acting on protocol messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A signaling or data-channel frame didn't parse.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Frame encoding failed (should not happen for well-formed input).
    #[error("encoding error: {0}")]
    EncodingError(String),

    /// Frame decoding failed — malformed header, truncated payload, bad tag.
    #[error("decoding error: {0}")]
    DecodingError(String),

    /// A data-channel frame's kind byte didn't match any known `FrameKind`.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// A transfer-engine state transition was attempted that the current
    /// state doesn't allow.
    #[error("invalid transfer state transition: {from:?} -> {to:?}")]
    InvalidStateTransition {
        /// Originating state
        from: String,
        /// Attempted destination state
        to: String,
    },

    /// The receiving peer declined the `file-request`.
    #[error("transfer declined")]
    Declined,

    /// No `file-response` arrived within the acceptance window.
    #[error("transfer request timed out")]
    Timeout,

    /// The transfer was cancelled by either side.
    #[error("transfer cancelled: {0:?}")]
    Cancelled(CancelReason),

    /// The reassembled file's SHA-256 didn't match the sender's `file-end` digest.
    #[error("transfer corrupt: digest mismatch")]
    Corrupt,

    /// Perfect negotiation failed to converge on a connection.
    #[error("negotiation failed: {0}")]
    NegotiationFailed(String),

    /// The underlying transport (PCM channel or RS socket) closed mid-transfer.
    #[error("transport closed")]
    TransportClosed,

    /// The room requires a password and none/the wrong one was presented.
    #[error("room password required")]
    PasswordRequired,

    /// The presented password hash didn't match the room's.
    #[error("room password incorrect")]
    PasswordIncorrect,

    /// Reserved: room admission capacity exceeded. No fixed room-size cap
    /// exists yet, but the wire's error vocabulary reserves the kind.
    #[error("room full")]
    RoomFull,

    /// Key exchange or encryption/decryption failed.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// I/O error reading/writing transfer payloads.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tallow_crypto::CryptoError> for ProtocolError {
    fn from(err: tallow_crypto::CryptoError) -> Self {
        Self::Crypto(err.to_string())
    }
}
