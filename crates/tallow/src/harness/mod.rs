//! Pieces that exist to exercise the CLI's own logic rather than to serve
//! an end user: an in-memory chat log and a TCP-socket stand-in for a
//! browser's `RTCPeerConnection`, used by integration tests.

pub mod chat_log;
pub mod tcp_adapter;

pub use chat_log::{ChatLog, ChatMessage};
pub use tcp_adapter::TcpHostAdapter;
