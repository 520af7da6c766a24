//! Room code validation and generation
//!
//! Room membership, roster, and password-hash state live on the room
//! server (`tallow-relay`); this module only holds the client-shared
//! room-code format rules.

pub mod code;
pub mod password;

pub use code::{generate, normalize};
pub use password::derive_password_hash;
