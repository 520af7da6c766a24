//! Sender-side transfer pipeline
//!
//! Drives a [`TransferStateMachine`] through `Requested -> Accepted ->
//! Streaming -> Done`, producing the `file-start`/`chunk`/`file-end` data
//! frames in order. Bytes live in memory for the lifetime of the transfer —
//! the host adapter is responsible for getting them there and for actually
//! putting frames on the wire.

use crate::ids::TransferId;
use crate::transfer::chunking::{self, CHUNK_SIZE, HIGH_WATER_MARK, LOW_WATER_MARK};
use crate::transfer::crypto::encrypt_relay_payload;
use crate::transfer::metadata::{FileMetadata, TransferMode};
use crate::transfer::state_machine::{CancelReason, Direction, TransferState, TransferStateMachine};
use crate::wire::codec::{DataFrame, FrameKind};
use crate::{ProtocolError, Result};

/// Drives the sending side of one file transfer.
pub struct SendPipeline {
    transfer_id: TransferId,
    data: Vec<u8>,
    mode: TransferMode,
    session_key: Option<[u8; 32]>,
    sm: TransferStateMachine,
    next_seq: u32,
    bytes_buffered_unacked: usize,
}

impl SendPipeline {
    /// Create a pipeline for sending `data` to a peer. `session_key` must be
    /// `Some` when `mode` is [`TransferMode::Relay`].
    pub fn new(
        transfer_id: TransferId,
        data: Vec<u8>,
        mode: TransferMode,
        session_key: Option<[u8; 32]>,
    ) -> Self {
        let mut sm = TransferStateMachine::new(Direction::Send);
        sm.transition(TransferState::Requested).expect("Init -> Requested is always valid");
        Self {
            transfer_id,
            data,
            mode,
            session_key,
            sm,
            next_seq: 0,
            bytes_buffered_unacked: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TransferState {
        self.sm.state()
    }

    /// File metadata for the `file-request` control message and `file-start` frame.
    pub fn metadata(&self, name: String) -> FileMetadata {
        FileMetadata {
            name,
            size: self.data.len() as u64,
            total_chunks: chunking::total_chunks(self.data.len() as u64),
        }
    }

    /// Record that the peer accepted the `file-request`.
    pub fn accept(&mut self) -> Result<()> {
        self.sm.transition(TransferState::Accepted)
    }

    /// Record that the peer declined, or that acceptance timed out.
    pub fn decline(&mut self) -> Result<()> {
        self.sm.transition(TransferState::Declined)?;
        self.sm.transition(TransferState::Failed)
    }

    /// Begin streaming: emits the `file-start` frame.
    pub fn start_streaming(&mut self, name: String) -> Result<DataFrame> {
        self.sm.transition(TransferState::Streaming)?;
        let payload = serde_json::to_vec(&self.metadata(name))
            .map_err(|e| ProtocolError::EncodingError(e.to_string()))?;
        Ok(DataFrame::new(FrameKind::FileStart, self.transfer_id, 0, payload))
    }

    /// Whether the outbound buffer should pause reading more source bytes.
    ///
    /// Mirrors the high/low-water hysteresis: once paused (buffer crossed
    /// `HIGH_WATER_MARK`), stays paused until it drains below `LOW_WATER_MARK`.
    pub fn should_pause(&self, currently_paused: bool) -> bool {
        if currently_paused {
            self.bytes_buffered_unacked >= LOW_WATER_MARK
        } else {
            self.bytes_buffered_unacked >= HIGH_WATER_MARK
        }
    }

    /// Mark `n` buffered bytes as flushed (acknowledged sent at the transport level).
    pub fn mark_flushed(&mut self, n: usize) {
        self.bytes_buffered_unacked = self.bytes_buffered_unacked.saturating_sub(n);
    }

    /// Produce the next chunk frame, or `None` once all chunks have been sent.
    pub fn next_chunk(&mut self) -> Result<Option<DataFrame>> {
        if self.sm.state() != TransferState::Streaming {
            return Err(ProtocolError::InvalidStateTransition {
                from: format!("{:?}", self.sm.state()),
                to: "Streaming (next_chunk)".to_string(),
            });
        }

        let start = self.next_seq as usize * CHUNK_SIZE;
        if start >= self.data.len() {
            return Ok(None);
        }
        let end = (start + CHUNK_SIZE).min(self.data.len());
        let plaintext = &self.data[start..end];

        let payload = match self.mode {
            TransferMode::P2p => plaintext.to_vec(),
            TransferMode::Relay => {
                let key = self.session_key.ok_or_else(|| {
                    ProtocolError::Crypto("relay mode requires a session key".to_string())
                })?;
                encrypt_relay_payload(&key, self.transfer_id, self.next_seq, plaintext)?
            }
        };

        self.bytes_buffered_unacked += payload.len();
        let frame = DataFrame::new(FrameKind::Chunk, self.transfer_id, self.next_seq, payload);
        self.next_seq += 1;
        Ok(Some(frame))
    }

    /// Finish streaming: emits the `file-end` frame carrying the SHA-256 of
    /// the cleartext file.
    pub fn finish(&mut self) -> Result<DataFrame> {
        if self.data.len() as u64 != chunking::total_chunks(self.data.len() as u64) * CHUNK_SIZE as u64
            && self.next_seq as u64 != chunking::total_chunks(self.data.len() as u64)
        {
            // Not all chunks sent yet.
            return Err(ProtocolError::InvalidMessage(
                "finish called before all chunks sent".to_string(),
            ));
        }
        let digest = tallow_crypto::hash::sha256(&self.data);
        self.sm.transition(TransferState::Done)?;
        Ok(DataFrame::new(
            FrameKind::FileEnd,
            self.transfer_id,
            self.next_seq,
            digest.to_vec(),
        ))
    }

    /// Cancel the transfer, producing the data-channel `cancel` frame.
    pub fn cancel(&mut self, reason: CancelReason) -> Result<DataFrame> {
        self.sm.transition(TransferState::Cancelled(reason))?;
        Ok(DataFrame::new(
            FrameKind::Cancel,
            self.transfer_id,
            self.next_seq,
            vec![reason.to_wire()],
        ))
    }
}
