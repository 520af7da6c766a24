//! Key agreement
//!
//! The protocol needs exactly one algorithm: ephemeral X25519 ECDH per
//! connected peer-pair, used to derive the relay-mode AEAD key.

pub mod x25519;

pub use x25519::X25519KeyPair;
