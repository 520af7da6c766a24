//! Room password checks
//!
//! The relay never sees a plaintext password — only the hex hash a client
//! derived via [`tallow_protocol::room::password::derive_password_hash`].
//! A room's expected hash (if any) is whatever the first peer to join
//! supplied; this module just does the constant-time comparison for every
//! joiner after that. The comparison itself lives on [`crate::room::Room`]
//! since it needs the room's stored hash; this module exists so the rule
//! ("no hash on an open room always passes") has one place to read.

/// Whether a join should be allowed given the room's expected hash (if any)
/// and the hash the joining peer supplied.
pub fn check(expected: Option<&str>, provided: Option<&str>) -> bool {
    match (expected, provided) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(expected), Some(provided)) => {
            use subtle::ConstantTimeEq;
            expected.len() == provided.len()
                && expected.as_bytes().ct_eq(provided.as_bytes()).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_room_always_passes() {
        assert!(check(None, None));
        assert!(check(None, Some("anything")));
    }

    #[test]
    fn password_room_requires_a_hash() {
        assert!(!check(Some("abc"), None));
    }

    #[test]
    fn matching_hash_passes() {
        assert!(check(Some("abc"), Some("abc")));
    }

    #[test]
    fn mismatched_hash_fails() {
        assert!(!check(Some("abc"), Some("xyz")));
    }
}
