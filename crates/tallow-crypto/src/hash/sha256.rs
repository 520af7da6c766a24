//! SHA-256, used for the file-transfer `file-end` integrity digest
//!
//! BLAKE3 is faster and used everywhere else in this crate, but the wire
//! protocol fixes SHA-256 specifically as the digest carried in the
//! `file-end` frame, so receivers can verify against a value a sender
//! computed once up front without depending on this crate's internals.

use sha2::{Digest, Sha256};

/// Hash `data` with SHA-256, returning the 32-byte digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Incremental SHA-256 hasher for streaming file contents chunk by chunk.
pub struct StreamHasher256 {
    inner: Sha256,
}

impl StreamHasher256 {
    /// Create a new streaming hasher.
    pub fn new() -> Self {
        Self {
            inner: Sha256::new(),
        }
    }

    /// Feed more bytes into the running hash.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Finalize and return the digest.
    pub fn finalize(self) -> [u8; 32] {
        self.inner.finalize().into()
    }
}

impl Default for StreamHasher256 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_vector() {
        // "hello world" -> well-known SHA-256 digest
        let digest = sha256(b"hello world");
        assert_eq!(
            hex_encode(&digest),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn streaming_matches_oneshot() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let oneshot = sha256(data);

        let mut streamed = StreamHasher256::new();
        streamed.update(&data[..10]);
        streamed.update(&data[10..]);
        assert_eq!(oneshot, streamed.finalize());
    }

    fn hex_encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
