//! # Tallow Cryptography Library
//!
//! Cryptographic primitives backing the room transfer protocol: constant-time
//! comparison for password-gate checks, AEAD for relay-mode chunk encryption,
//! X25519 for per-peer-pair key agreement, BLAKE3/SHA-256 hashing, and
//! Argon2id for the client-side room password KDF.
//!
//! ## Features
//!
//! - **Memory Safety**: automatic zeroization of sensitive data
//! - **Constant-Time Operations**: protection against timing side-channels
//! - **Domain Separation**: BLAKE3 domain separation for all key derivation

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod hash;
pub mod kdf;
pub mod kem;
pub mod symmetric;

// Re-export commonly used types
pub use error::{CryptoError, Result};
pub use hash::blake3;

/// Library version constant
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
