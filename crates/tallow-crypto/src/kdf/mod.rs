//! Key derivation functions
//!
//! HKDF-SHA256 for general key expansion, Argon2id for the room
//! password-hash derivation the client performs before ever sending a
//! password hash to the room server.

pub mod argon2;
pub mod hkdf;

pub use self::argon2::{hash_password, verify_password};
pub use self::hkdf::derive;
