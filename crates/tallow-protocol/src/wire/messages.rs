//! Room-server signaling messages
//!
//! Everything on the room-server WebSocket is JSON text shaped
//! `{type, from?, to?, data?}`. [`RelayEnvelope`] is that generic shape —
//! the room server only needs to read `type` and `to` to route a frame, so
//! it deserializes into this and treats `data` as an opaque [`serde_json::Value`].
//! [`ClientMessage`] is the typed subset a client constructs and consumes.

use crate::ids::PeerId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The generic envelope the room server parses to decide where to route a message.
///
/// Used for the forward-verbatim path: the server never needs to understand
/// `data`, only `type` (to decide whether it's forwardable/broadcastable) and
/// `to` (to pick a recipient).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayEnvelope {
    /// Discriminant, e.g. `"offer"`, `"file-request"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Sender's peer id. Servers overwrite this on forward to prevent spoofing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<PeerId>,
    /// Recipient's peer id. Absent for broadcasts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<PeerId>,
    /// Opaque payload, forwarded byte-for-byte.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Message kinds the room server forwards verbatim to a named `to` peer,
/// dropping silently if that peer isn't connected.
pub const FORWARDABLE_KINDS: &[&str] = &[
    "offer",
    "answer",
    "ice-candidate",
    "text",
    "relay-data",
    "key-exchange",
    "file-request",
    "file-response",
    "file-cancel",
];

/// Message kinds the room server broadcasts to every peer except the sender.
pub const BROADCAST_KINDS: &[&str] = &["peer-joined", "peer-left", "name-changed"];

/// A device's broad class, reported at join time for display purposes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Desktop or laptop.
    Desktop,
    /// Phone-sized touch device.
    Mobile,
    /// Tablet-sized touch device.
    Tablet,
}

/// Data carried by a `join` message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinData {
    /// Display name chosen by the joining peer.
    pub name: String,
    /// Device class, for roster display.
    #[serde(rename = "deviceType")]
    pub device_type: DeviceClass,
    /// Free-form browser/user-agent string.
    #[serde(rename = "browserInfo")]
    pub browser_info: Option<String>,
}

/// A peer as shown in a roster (`joined.peers` or `peer-joined.data`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterPeer {
    /// The peer's assigned id.
    pub id: PeerId,
    /// Display name.
    pub name: String,
    /// Device class.
    #[serde(rename = "deviceType")]
    pub device_type: DeviceClass,
    /// Free-form browser/user-agent string.
    #[serde(rename = "browserInfo")]
    pub browser_info: Option<String>,
}

/// Data carried in a `file-request`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRequestData {
    /// Sender-chosen transfer id (UUID string).
    #[serde(rename = "fileId")]
    pub file_id: String,
    /// Original filename, sanitized on the receiving end before use.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Number of chunks the sender will send.
    #[serde(rename = "totalChunks")]
    pub total_chunks: u64,
    /// Whether this transfer will run over the p2p data channel or relay.
    #[serde(rename = "transferMode")]
    pub transfer_mode: TransferModeWire,
}

/// The `transferMode` field of a `file-request`, as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferModeWire {
    /// Direct peer-to-peer data channel.
    P2p,
    /// Routed through the room server's relay-data forwarding.
    Relay,
}

/// Data carried in a `file-response`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResponseData {
    /// The transfer id this responds to.
    #[serde(rename = "fileId")]
    pub file_id: String,
    /// Whether the receiver accepted the offer.
    pub accepted: bool,
}

/// Data carried in a `file-cancel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileCancelData {
    /// The transfer id being cancelled.
    #[serde(rename = "fileId")]
    pub file_id: String,
    /// Why it was cancelled.
    pub reason: FileCancelReason,
}

/// Reason carried on the `file-cancel` control-plane message.
///
/// Distinct from [`crate::transfer::state_machine::CancelReason`]'s wire
/// byte on the data channel — same three reasons, different serialization,
/// because this one travels as JSON through the room server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileCancelReason {
    /// The user explicitly cancelled.
    User,
    /// The peer left the room.
    PeerLeft,
    /// An unrecoverable error occurred.
    Error,
}

/// Data carried in a `key-exchange`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyExchangeData {
    /// Base64-encoded 32-byte X25519 public key.
    #[serde(rename = "publicKey")]
    pub public_key: String,
}

/// Data carried in a `relay-data` frame wrapping one data-channel chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayDataPayload {
    /// Sequence number, for receiver-side reassembly independent of arrival order.
    pub seq: u32,
    /// Base64-encoded frame bytes (plaintext if p2p-equivalent, AEAD ciphertext if relayed).
    pub payload_b64: String,
    /// Whether `payload_b64` is AEAD-encrypted.
    pub enc: bool,
}

/// Data carried in an `error` message sent by the room server on admission failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorData {
    /// One of `"PASSWORD_REQUIRED"` or `"PASSWORD_INCORRECT"`.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_message_serializes_with_camel_case_fields() {
        let data = JoinData {
            name: "alice".to_string(),
            device_type: DeviceClass::Desktop,
            browser_info: Some("firefox".to_string()),
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["deviceType"], "desktop");
        assert_eq!(json["browserInfo"], "firefox");
    }

    #[test]
    fn relay_envelope_omits_absent_fields() {
        let env = RelayEnvelope {
            kind: "peer-left".to_string(),
            from: None,
            to: None,
            data: Some(serde_json::json!({"id": "p1"})),
        };
        let json = serde_json::to_string(&env).unwrap();
        assert!(!json.contains("\"from\""));
        assert!(!json.contains("\"to\""));
    }

    #[test]
    fn file_cancel_reason_is_kebab_case() {
        let data = FileCancelData {
            file_id: "x".to_string(),
            reason: FileCancelReason::PeerLeft,
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["reason"], "peer-left");
    }

    #[test]
    fn envelope_roundtrips_through_json() {
        let raw = r#"{"type":"offer","to":"p2","data":{"sdp":"v=0..."}}"#;
        let env: RelayEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(env.kind, "offer");
        assert_eq!(env.to, Some(PeerId::from("p2")));
        assert!(env.from.is_none());
    }
}
