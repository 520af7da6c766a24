//! Room password-hash derivation
//!
//! The room server never sees a plaintext password. The client derives a
//! hash salted by the room code (so the same password doesn't hash to the
//! same value across two different rooms) and sends only the hash; the
//! server stores and compares hashes opaquely via constant-time equality.

use crate::ids::RoomCode;
use crate::Result;

/// Output length, in bytes, of the derived password hash.
const HASH_LEN: usize = 32;

/// Derive the hex-encoded password hash the client sends to the room server.
///
/// Uses Argon2id salted by a BLAKE3 hash of the room code, truncated to the
/// 16 bytes `derive_key` requires. Argon2id is a memory-hard successor to
/// classic PBKDF2 and is used here in place of it; see the workspace design
/// notes for the rationale.
pub fn derive_password_hash(password: &str, room_code: &RoomCode) -> Result<String> {
    let salt = room_salt(room_code);
    let key = tallow_crypto::kdf::argon2::derive_key(password.as_bytes(), &salt, HASH_LEN)?;
    Ok(hex_encode(&key))
}

fn room_salt(room_code: &RoomCode) -> [u8; 16] {
    let digest = tallow_crypto::hash::blake3::hash(room_code.0.as_bytes());
    let mut salt = [0u8; 16];
    salt.copy_from_slice(&digest[..16]);
    salt
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_room_and_password() {
        let room = RoomCode("ABCD1234".to_string());
        let h1 = derive_password_hash("hunter2", &room).unwrap();
        let h2 = derive_password_hash("hunter2", &room).unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn differs_across_rooms() {
        let room_a = RoomCode("AAAAAAAA".to_string());
        let room_b = RoomCode("BBBBBBBB".to_string());
        let h1 = derive_password_hash("hunter2", &room_a).unwrap();
        let h2 = derive_password_hash("hunter2", &room_b).unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn differs_for_wrong_password() {
        let room = RoomCode("ABCD1234".to_string());
        let h1 = derive_password_hash("correct", &room).unwrap();
        let h2 = derive_password_hash("incorrect", &room).unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn output_is_hex() {
        let room = RoomCode("ABCD1234".to_string());
        let h = derive_password_hash("x", &room).unwrap();
        assert_eq!(h.len(), HASH_LEN * 2);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
