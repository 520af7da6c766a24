//! Receiver-side transfer pipeline
//!
//! Mirrors [`super::send::SendPipeline`]: drives a [`TransferStateMachine`]
//! through `Requested -> Accepted -> Receiving -> Done`, reassembling
//! `chunk` frames in memory and verifying the `file-end` digest.
//!
//! Frames for a transfer id this pipeline hasn't accepted yet (or has
//! already finished) are rejected rather than silently buffered — a sender
//! racing ahead of the `file-response` round trip is a protocol error, not
//! something to paper over.

use crate::ids::TransferId;
use crate::transfer::crypto::decrypt_relay_payload;
use crate::transfer::metadata::{FileMetadata, TransferMode};
use crate::transfer::sanitize::sanitize_filename;
use crate::transfer::state_machine::{CancelReason, Direction, TransferState, TransferStateMachine};
use crate::wire::codec::{DataFrame, FrameKind};
use crate::{ProtocolError, Result};
use std::path::{Path, PathBuf};

/// Drives the receiving side of one file transfer.
pub struct ReceivePipeline {
    transfer_id: TransferId,
    mode: TransferMode,
    session_key: Option<[u8; 32]>,
    output_dir: PathBuf,
    sm: TransferStateMachine,
    metadata: Option<FileMetadata>,
    dest_path: Option<PathBuf>,
    buffer: Vec<u8>,
    next_seq: u32,
}

impl ReceivePipeline {
    /// Create a pipeline expecting an inbound transfer with the given id.
    /// Received files are sanitized against, and must resolve under,
    /// `output_dir`.
    pub fn new(
        transfer_id: TransferId,
        output_dir: impl AsRef<Path>,
        mode: TransferMode,
        session_key: Option<[u8; 32]>,
    ) -> Self {
        let mut sm = TransferStateMachine::new(Direction::Recv);
        sm.transition(TransferState::Requested).expect("Init -> Requested is always valid");
        Self {
            transfer_id,
            mode,
            session_key,
            output_dir: output_dir.as_ref().to_path_buf(),
            sm,
            metadata: None,
            dest_path: None,
            buffer: Vec::new(),
            next_seq: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TransferState {
        self.sm.state()
    }

    /// Sanitized destination path of the accepted transfer, once `file-start`
    /// has been processed.
    pub fn dest_path(&self) -> Option<&Path> {
        self.dest_path.as_deref()
    }

    /// Record that the local user accepted the incoming `file-request`.
    pub fn accept(&mut self) -> Result<()> {
        self.sm.transition(TransferState::Accepted)
    }

    /// Record that the local user declined the incoming `file-request`.
    pub fn decline(&mut self) -> Result<()> {
        self.sm.transition(TransferState::Declined)?;
        self.sm.transition(TransferState::Failed)
    }

    /// Feed one data-channel frame belonging to this transfer.
    ///
    /// Returns `Some(bytes)` once the `file-end` frame completes the
    /// transfer and the digest checks out.
    pub fn handle_frame(&mut self, frame: DataFrame) -> Result<Option<Vec<u8>>> {
        if frame.transfer_id != self.transfer_id {
            return Err(ProtocolError::InvalidMessage(
                "frame does not belong to this transfer".to_string(),
            ));
        }

        match frame.kind {
            FrameKind::FileStart => {
                self.sm.transition(TransferState::Receiving)?;
                let meta: FileMetadata = serde_json::from_slice(&frame.payload)
                    .map_err(|e| ProtocolError::DecodingError(e.to_string()))?;
                let dest = sanitize_filename(&meta.name, &self.output_dir)
                    .map_err(|e| ProtocolError::InvalidMessage(e.to_string()))?;
                self.buffer = Vec::with_capacity(meta.size.min(64 * 1024 * 1024) as usize);
                self.dest_path = Some(dest);
                self.metadata = Some(meta);
                Ok(None)
            }
            FrameKind::Chunk => {
                self.ensure_receiving()?;
                if frame.seq != self.next_seq {
                    return Err(ProtocolError::InvalidMessage(format!(
                        "out-of-order chunk: expected seq {}, got {}",
                        self.next_seq, frame.seq
                    )));
                }
                let plaintext = self.decrypt_if_needed(frame.seq, &frame.payload)?;

                let total_bytes_after = self.buffer.len() as u64 + plaintext.len() as u64;
                if let Some(meta) = &self.metadata {
                    if total_bytes_after > meta.size {
                        return Err(ProtocolError::InvalidMessage(
                            "received more bytes than file-start declared".to_string(),
                        ));
                    }
                }

                self.buffer.extend_from_slice(&plaintext);
                self.next_seq += 1;
                Ok(None)
            }
            FrameKind::FileEnd => {
                self.ensure_receiving()?;
                if frame.payload.len() != 32 {
                    return Err(ProtocolError::InvalidFrame(
                        "file-end digest must be 32 bytes".to_string(),
                    ));
                }
                let expected: [u8; 32] = frame.payload.try_into().unwrap();
                let actual = tallow_crypto::hash::sha256(&self.buffer);
                if actual != expected {
                    self.sm.transition(TransferState::Failed)?;
                    return Err(ProtocolError::Corrupt);
                }
                self.sm.transition(TransferState::Done)?;
                Ok(Some(std::mem::take(&mut self.buffer)))
            }
            FrameKind::Cancel => {
                let reason = frame
                    .payload
                    .first()
                    .and_then(|b| CancelReason::from_wire(*b))
                    .unwrap_or(CancelReason::Error);
                self.sm.transition(TransferState::Cancelled(reason))?;
                Ok(None)
            }
            FrameKind::Text => Err(ProtocolError::InvalidMessage(
                "text frame sent to a file transfer pipeline".to_string(),
            )),
        }
    }

    fn ensure_receiving(&self) -> Result<()> {
        if self.sm.state() != TransferState::Receiving {
            return Err(ProtocolError::InvalidStateTransition {
                from: format!("{:?}", self.sm.state()),
                to: "Receiving (handle_frame)".to_string(),
            });
        }
        Ok(())
    }

    fn decrypt_if_needed(&self, seq: u32, payload: &[u8]) -> Result<Vec<u8>> {
        match self.mode {
            TransferMode::P2p => Ok(payload.to_vec()),
            TransferMode::Relay => {
                let key = self.session_key.ok_or_else(|| {
                    ProtocolError::Crypto("relay mode requires a session key".to_string())
                })?;
                decrypt_relay_payload(&key, self.transfer_id, seq, payload)
            }
        }
    }
}

/// Decode a single text frame's payload (no chunking, no state machine: a
/// text message is one frame).
pub fn decode_text_frame(
    frame: &DataFrame,
    mode: TransferMode,
    session_key: Option<&[u8; 32]>,
) -> Result<String> {
    if frame.kind != FrameKind::Text {
        return Err(ProtocolError::InvalidMessage("not a text frame".to_string()));
    }
    let plaintext = match mode {
        TransferMode::P2p => frame.payload.clone(),
        TransferMode::Relay => {
            let key = session_key
                .ok_or_else(|| ProtocolError::Crypto("relay mode requires a session key".to_string()))?;
            decrypt_relay_payload(key, frame.transfer_id, frame.seq, &frame.payload)?
        }
    };
    String::from_utf8(plaintext).map_err(|e| ProtocolError::DecodingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::crypto::encrypt_relay_payload;

    fn start_frame(id: TransferId, name: &str, size: u64) -> DataFrame {
        let meta = FileMetadata {
            name: name.to_string(),
            size,
            total_chunks: crate::transfer::chunking::total_chunks(size),
        };
        DataFrame::new(FrameKind::FileStart, id, 0, serde_json::to_vec(&meta).unwrap())
    }

    fn pipeline(id: TransferId, mode: TransferMode, key: Option<[u8; 32]>) -> ReceivePipeline {
        ReceivePipeline::new(id, "/tmp/tallow-downloads", mode, key)
    }

    #[test]
    fn happy_path_reassembles_and_verifies_digest() {
        let id = TransferId::generate();
        let data = b"hello from the other side".to_vec();
        let digest = tallow_crypto::hash::sha256(&data);

        let mut p = pipeline(id, TransferMode::P2p, None);
        p.accept().unwrap();
        p.handle_frame(start_frame(id, "note.txt", data.len() as u64)).unwrap();
        p.handle_frame(DataFrame::new(FrameKind::Chunk, id, 0, data.clone())).unwrap();
        let result = p
            .handle_frame(DataFrame::new(FrameKind::FileEnd, id, 1, digest.to_vec()))
            .unwrap();

        assert_eq!(result, Some(data));
        assert_eq!(p.state(), TransferState::Done);
        assert!(p.dest_path().unwrap().ends_with("note.txt"));
    }

    #[test]
    fn digest_mismatch_fails_and_does_not_return_bytes() {
        let id = TransferId::generate();
        let data = b"some bytes".to_vec();
        let wrong_digest = [0u8; 32];

        let mut p = pipeline(id, TransferMode::P2p, None);
        p.accept().unwrap();
        p.handle_frame(start_frame(id, "f", data.len() as u64)).unwrap();
        p.handle_frame(DataFrame::new(FrameKind::Chunk, id, 0, data)).unwrap();
        let result = p.handle_frame(DataFrame::new(FrameKind::FileEnd, id, 1, wrong_digest.to_vec()));

        assert!(result.is_err());
        assert_eq!(p.state(), TransferState::Failed);
    }

    #[test]
    fn chunk_before_file_start_is_rejected() {
        let id = TransferId::generate();
        let mut p = pipeline(id, TransferMode::P2p, None);
        p.accept().unwrap();
        let result = p.handle_frame(DataFrame::new(FrameKind::Chunk, id, 0, vec![1, 2, 3]));
        assert!(result.is_err());
    }

    #[test]
    fn out_of_order_chunk_is_rejected() {
        let id = TransferId::generate();
        let mut p = pipeline(id, TransferMode::P2p, None);
        p.accept().unwrap();
        p.handle_frame(start_frame(id, "f", 10)).unwrap();
        let result = p.handle_frame(DataFrame::new(FrameKind::Chunk, id, 5, vec![1]));
        assert!(result.is_err());
    }

    #[test]
    fn frame_for_different_transfer_id_is_rejected() {
        let id = TransferId::generate();
        let other = TransferId::generate();
        let mut p = pipeline(id, TransferMode::P2p, None);
        p.accept().unwrap();
        let result = p.handle_frame(start_frame(other, "f", 10));
        assert!(result.is_err());
    }

    #[test]
    fn chunk_total_exceeding_declared_size_is_rejected() {
        let id = TransferId::generate();
        let mut p = pipeline(id, TransferMode::P2p, None);
        p.accept().unwrap();
        p.handle_frame(start_frame(id, "f", 3)).unwrap();
        let result = p.handle_frame(DataFrame::new(FrameKind::Chunk, id, 0, vec![1, 2, 3, 4]));
        assert!(result.is_err());
    }

    #[test]
    fn relay_mode_decrypts_chunks() {
        let id = TransferId::generate();
        let key = [4u8; 32];
        let data = b"secret payload".to_vec();
        let digest = tallow_crypto::hash::sha256(&data);
        let ciphertext = encrypt_relay_payload(&key, id, 0, &data).unwrap();

        let mut p = pipeline(id, TransferMode::Relay, Some(key));
        p.accept().unwrap();
        p.handle_frame(start_frame(id, "f", data.len() as u64)).unwrap();
        p.handle_frame(DataFrame::new(FrameKind::Chunk, id, 0, ciphertext)).unwrap();
        let result = p
            .handle_frame(DataFrame::new(FrameKind::FileEnd, id, 1, digest.to_vec()))
            .unwrap();
        assert_eq!(result, Some(data));
    }

    #[test]
    fn cancel_frame_is_terminal() {
        let id = TransferId::generate();
        let mut p = pipeline(id, TransferMode::P2p, None);
        p.accept().unwrap();
        p.handle_frame(start_frame(id, "f", 10)).unwrap();
        p.handle_frame(DataFrame::new(
            FrameKind::Cancel,
            id,
            0,
            vec![CancelReason::PeerLeft.to_wire()],
        ))
        .unwrap();
        assert_eq!(p.state(), TransferState::Cancelled(CancelReason::PeerLeft));
    }

    #[test]
    fn file_start_sanitizes_path_traversal_in_name() {
        let id = TransferId::generate();
        let mut p = pipeline(id, TransferMode::P2p, None);
        p.accept().unwrap();
        p.handle_frame(start_frame(id, "../../etc/passwd", 0)).unwrap();
        assert!(p.dest_path().unwrap().starts_with("/tmp/tallow-downloads"));
    }

    #[test]
    fn decode_text_frame_roundtrips_p2p() {
        let id = TransferId::generate();
        let frame = DataFrame::new(FrameKind::Text, id, 0, b"hi there".to_vec());
        let text = decode_text_frame(&frame, TransferMode::P2p, None).unwrap();
        assert_eq!(text, "hi there");
    }
}
