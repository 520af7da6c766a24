//! Room code validation and generation
//!
//! A room code is 4-16 alphanumeric characters, stored and compared
//! upper-cased so `ab12` and `AB12` are the same room.

use crate::ids::RoomCode;
use rand::Rng;

/// Minimum room code length.
pub const MIN_LEN: usize = 4;
/// Maximum room code length.
pub const MAX_LEN: usize = 16;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Validate and normalize a user- or peer-supplied room code.
///
/// Returns `None` if `raw` isn't 4-16 ASCII alphanumeric characters.
pub fn normalize(raw: &str) -> Option<RoomCode> {
    if raw.len() < MIN_LEN || raw.len() > MAX_LEN {
        return None;
    }
    if !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(RoomCode(raw.to_ascii_uppercase()))
}

/// Generate a random room code of `len` characters (clamped to `[MIN_LEN, MAX_LEN]`).
pub fn generate(len: usize) -> RoomCode {
    let len = len.clamp(MIN_LEN, MAX_LEN);
    let mut rng = rand::thread_rng();
    let code: String = (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    RoomCode(code)
}
