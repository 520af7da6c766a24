//! Binary data-channel frame codec
//!
//! Every data-channel frame has a fixed 25-byte header followed by its
//! payload — no JSON here, unlike the room-server signaling messages in
//! [`super::messages`].
//!
//! ```text
//! offset  size  field
//! 0       1     frame-kind
//! 1       16    transfer-id
//! 17      4     seq (u32, big-endian)
//! 21      4     payload-len (u32, big-endian)
//! 25      ..    payload
//! ```

use crate::ids::TransferId;
use crate::{ProtocolError, Result};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// The fixed header length, in bytes, before the payload.
pub const HEADER_LEN: usize = 25;

/// A data-channel frame's kind byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Single-shot text message, no handshake.
    Text = 0x01,
    /// First frame of a file transfer; payload is JSON `{name,size,totalChunks}`.
    FileStart = 0x02,
    /// A chunk of file payload (opaque bytes, AEAD-encrypted if relayed).
    Chunk = 0x03,
    /// Last frame of a file transfer; payload is the 32-byte SHA-256 digest.
    FileEnd = 0x04,
    /// Cancellation; one-byte payload encodes the reason.
    Cancel = 0x05,
}

impl FrameKind {
    /// Decode from the wire byte, or `None` if it doesn't match a known kind.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(Self::Text),
            0x02 => Some(Self::FileStart),
            0x03 => Some(Self::Chunk),
            0x04 => Some(Self::FileEnd),
            0x05 => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// A decoded (or to-be-encoded) data-channel frame.
#[derive(Debug, Clone)]
pub struct DataFrame {
    /// The frame's kind.
    pub kind: FrameKind,
    /// The transfer this frame belongs to.
    pub transfer_id: TransferId,
    /// Monotonically increasing sequence number within this transfer's direction.
    pub seq: u32,
    /// The frame's payload, meaning depends on `kind`.
    pub payload: Vec<u8>,
}

impl DataFrame {
    /// Convenience constructor.
    pub fn new(kind: FrameKind, transfer_id: TransferId, seq: u32, payload: Vec<u8>) -> Self {
        Self {
            kind,
            transfer_id,
            seq,
            payload,
        }
    }
}

/// Stateless `tokio_util::codec` implementation for [`DataFrame`]s.
#[derive(Debug, Default)]
pub struct FrameCodec;

impl FrameCodec {
    /// Create a new codec.
    pub fn new() -> Self {
        Self
    }
}

impl Encoder<DataFrame> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, frame: DataFrame, buf: &mut BytesMut) -> Result<()> {
        let payload_len = frame.payload.len();
        if payload_len > u32::MAX as usize {
            return Err(ProtocolError::EncodingError(
                "payload exceeds u32::MAX".to_string(),
            ));
        }

        buf.reserve(HEADER_LEN + payload_len);
        buf.put_u8(frame.kind as u8);
        buf.put_slice(&frame.transfer_id.0);
        buf.put_u32(frame.seq);
        buf.put_u32(payload_len as u32);
        buf.put_slice(&frame.payload);
        Ok(())
    }
}

impl Decoder for FrameCodec {
    type Item = DataFrame;
    type Error = ProtocolError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<DataFrame>> {
        if buf.len() < HEADER_LEN {
            return Ok(None);
        }

        let kind_byte = buf[0];
        let kind = FrameKind::from_byte(kind_byte)
            .ok_or_else(|| ProtocolError::InvalidFrame(format!("unknown frame kind {kind_byte:#x}")))?;

        let mut transfer_id_bytes = [0u8; 16];
        transfer_id_bytes.copy_from_slice(&buf[1..17]);

        let seq = u32::from_be_bytes(buf[17..21].try_into().unwrap());
        let payload_len = u32::from_be_bytes(buf[21..25].try_into().unwrap()) as usize;

        if buf.len() < HEADER_LEN + payload_len {
            // Not enough data yet; reserve the rest and wait for more.
            buf.reserve(HEADER_LEN + payload_len - buf.len());
            return Ok(None);
        }

        buf.advance(HEADER_LEN);
        let payload = buf.split_to(payload_len).to_vec();

        Ok(Some(DataFrame {
            kind,
            transfer_id: TransferId(transfer_id_bytes),
            seq,
            payload,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(frame: DataFrame) -> DataFrame {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::new();
        codec.encode(frame, &mut buf).unwrap();
        codec.decode(&mut buf).unwrap().expect("frame decoded")
    }

    #[test]
    fn chunk_frame_roundtrips() {
        let id = TransferId::generate();
        let frame = DataFrame::new(FrameKind::Chunk, id, 3, vec![1, 2, 3, 4, 5]);
        let decoded = roundtrip(frame);
        assert_eq!(decoded.kind, FrameKind::Chunk);
        assert_eq!(decoded.transfer_id, id);
        assert_eq!(decoded.seq, 3);
        assert_eq!(decoded.payload, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn zero_length_payload_roundtrips() {
        let id = TransferId::generate();
        let frame = DataFrame::new(FrameKind::FileEnd, id, 0, vec![]);
        let decoded = roundtrip(frame);
        assert!(decoded.payload.is_empty());
    }

    #[test]
    fn decode_waits_for_full_header() {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::from(&[0x01u8; 10][..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn decode_waits_for_full_payload() {
        let id = TransferId::generate();
        let frame = DataFrame::new(FrameKind::Chunk, id, 0, vec![0u8; 100]);
        let mut codec = FrameCodec::new();
        let mut full = BytesMut::new();
        codec.encode(frame, &mut full).unwrap();

        // Feed only the header plus a few payload bytes.
        let mut partial = BytesMut::from(&full[..HEADER_LEN + 5]);
        assert!(codec.decode(&mut partial).unwrap().is_none());
    }

    #[test]
    fn unknown_frame_kind_is_invalid() {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::new();
        buf.put_u8(0xEE);
        buf.put_slice(&[0u8; 16]);
        buf.put_u32(0);
        buf.put_u32(0);
        assert!(codec.decode(&mut buf).is_err());
    }

    #[test]
    fn two_frames_back_to_back_decode_independently() {
        let id = TransferId::generate();
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::new();
        codec
            .encode(DataFrame::new(FrameKind::Chunk, id, 0, vec![1]), &mut buf)
            .unwrap();
        codec
            .encode(DataFrame::new(FrameKind::Chunk, id, 1, vec![2]), &mut buf)
            .unwrap();

        let first = codec.decode(&mut buf).unwrap().unwrap();
        let second = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(first.seq, 0);
        assert_eq!(second.seq, 1);
    }
}
