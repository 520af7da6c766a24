//! Tallow persistent storage layer
//!
//! Manages client configuration and the trusted-device store: the only
//! state a room-based transfer client keeps across sessions. Message
//! history is explicitly not persisted here — it lives in the host
//! adapter's in-memory chat log for the lifetime of one run.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod persistence;
pub mod trust;

pub use error::StoreError;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
