//! Cryptographic hash functions and utilities
//!
//! BLAKE3 for keyed/domain-separated derivation (room ids, session keys);
//! SHA-256 for the file-transfer integrity check in the wire protocol,
//! since the spec fixes SHA-256 as the on-wire digest algorithm.

pub mod blake3;
pub mod sha256;

pub use self::blake3::{derive_key, hash, keyed_hash};
pub use self::sha256::sha256;
