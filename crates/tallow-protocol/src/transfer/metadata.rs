//! File transfer metadata carried in the `file-start` frame and the
//! `file-request` control message.

use crate::wire::messages::TransferModeWire;
use serde::{Deserialize, Serialize};

/// Which path a transfer's bytes travel over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// Direct peer-to-peer data channel; DTLS-protected, frames sent in cleartext.
    P2p,
    /// Routed through the room server's relay-data forwarding; AEAD-encrypted.
    Relay,
}

impl From<TransferModeWire> for TransferMode {
    fn from(w: TransferModeWire) -> Self {
        match w {
            TransferModeWire::P2p => Self::P2p,
            TransferModeWire::Relay => Self::Relay,
        }
    }
}

impl From<TransferMode> for TransferModeWire {
    fn from(m: TransferMode) -> Self {
        match m {
            TransferMode::P2p => Self::P2p,
            TransferMode::Relay => Self::Relay,
        }
    }
}

/// The JSON payload of a `file-start` data-channel frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Original filename, sanitized by the receiver before it touches disk.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Number of chunk frames the sender will send.
    #[serde(rename = "totalChunks")]
    pub total_chunks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_total_chunks() {
        let m = FileMetadata {
            name: "a.bin".to_string(),
            size: 10,
            total_chunks: 1,
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["totalChunks"], 1);
    }
}
