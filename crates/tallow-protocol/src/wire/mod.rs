//! Wire protocol: the room-server JSON signaling envelope and the
//! binary data-channel frame codec.

pub mod codec;
pub mod messages;

pub use codec::{DataFrame, FrameCodec, FrameKind, HEADER_LEN};
pub use messages::{RelayEnvelope, BROADCAST_KINDS, FORWARDABLE_KINDS};
