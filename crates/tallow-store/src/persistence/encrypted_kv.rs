//! Encrypted key-value store
//!
//! Backs the on-disk trust store: an in-memory `HashMap<String, Vec<u8>>`
//! that's bincode-serialized and sealed as one ChaCha20-Poly1305 blob on
//! save. The encryption key is derived from a user-supplied password via
//! Argon2id, salted per file, so a stolen trust-store file reveals nothing
//! without the password.

use crate::{Result, StoreError};
use std::collections::HashMap;
use std::path::Path;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;

/// An encrypted, file-backed key-value store.
#[derive(Debug, Default)]
pub struct EncryptedKv {
    store: HashMap<String, Vec<u8>>,
}

impl EncryptedKv {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.store.get(key).map(Vec::as_slice)
    }

    /// Set a value.
    pub fn set(&mut self, key: &str, value: Vec<u8>) {
        self.store.insert(key.to_string(), value);
    }

    /// Delete a value. Returns `true` if it existed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.store.remove(key).is_some()
    }

    /// Load and decrypt a store from `path`. A missing file yields an
    /// empty store rather than an error, matching first-run behavior.
    pub fn load(path: &Path, password: &[u8]) -> Result<Self> {
        let sealed = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(StoreError::from(e)),
        };

        if sealed.len() < SALT_LEN + NONCE_LEN {
            return Err(StoreError::Persistence("trust store file is truncated".to_string()));
        }
        let (salt, rest) = sealed.split_at(SALT_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        let mut salt_arr = [0u8; SALT_LEN];
        salt_arr.copy_from_slice(salt);
        let mut nonce_arr = [0u8; NONCE_LEN];
        nonce_arr.copy_from_slice(nonce);

        let key = derive_key(password, &salt_arr)?;
        let plaintext = tallow_crypto::symmetric::chacha_decrypt(&key, &nonce_arr, ciphertext, b"tallow.trust.v1")?;
        let store: HashMap<String, Vec<u8>> =
            bincode::deserialize(&plaintext).map_err(|e| StoreError::Persistence(e.to_string()))?;

        Ok(Self { store })
    }

    /// Encrypt and write this store to `path`, creating it if needed.
    pub fn save(&self, path: &Path, password: &[u8]) -> Result<()> {
        let plaintext =
            bincode::serialize(&self.store).map_err(|e| StoreError::Persistence(e.to_string()))?;

        use rand::RngCore;
        let mut rng = rand::thread_rng();
        let mut salt = [0u8; SALT_LEN];
        rng.fill_bytes(&mut salt);
        let mut nonce = [0u8; NONCE_LEN];
        rng.fill_bytes(&mut nonce);

        let key = derive_key(password, &salt)?;
        let ciphertext = tallow_crypto::symmetric::chacha_encrypt(&key, &nonce, &plaintext, b"tallow.trust.v1")?;

        let mut sealed = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&salt);
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, sealed)?;
        Ok(())
    }
}

fn derive_key(password: &[u8], salt: &[u8; SALT_LEN]) -> Result<[u8; 32]> {
    let derived = tallow_crypto::kdf::argon2::derive_key(password, salt, 32)?;
    let mut key = [0u8; 32];
    key.copy_from_slice(&derived);
    Ok(key)
}
