//! Local-at-rest loading of the trusted-device store
//!
//! [`tallow_store::trust::TrustStore`] is encrypted on disk with
//! [`tallow_store::persistence::EncryptedKv`], which needs a password.
//! There's no multi-user secret to protect here — the threat model is
//! "someone copies the file off disk", not "someone else on this
//! machine" — so the password is a random per-install key generated on
//! first run and kept next to the trust store itself, the same way an
//! SSH agent or a local keychain backend would.

use std::io;
use std::path::PathBuf;

use rand::RngCore;
use tallow_store::persistence::{paths, EncryptedKv};
use tallow_store::trust::TrustStore;

const TRUST_KEY_LEN: usize = 32;

fn trust_key_path() -> PathBuf {
    paths::data_dir().join("trust.key")
}

fn load_or_create_key() -> io::Result<[u8; TRUST_KEY_LEN]> {
    let path = trust_key_path();
    if let Ok(bytes) = std::fs::read(&path) {
        if bytes.len() == TRUST_KEY_LEN {
            let mut key = [0u8; TRUST_KEY_LEN];
            key.copy_from_slice(&bytes);
            return Ok(key);
        }
    }

    let mut key = [0u8; TRUST_KEY_LEN];
    rand::thread_rng().fill_bytes(&mut key);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, key)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(key)
}

const TRUST_KV_KEY: &str = "trust";

/// Load the trust store from its single `EncryptedKv` entry, empty if
/// this is the first run.
pub fn load() -> io::Result<TrustStore> {
    let key = load_or_create_key()?;
    let kv = EncryptedKv::load(&paths::trust_file(), &key).map_err(io::Error::other)?;
    match kv.get(TRUST_KV_KEY) {
        Some(bytes) => bincode::deserialize(bytes).map_err(io::Error::other),
        None => Ok(TrustStore::new()),
    }
}

/// Persist the trust store as a single encrypted blob.
pub fn save(store: &TrustStore) -> io::Result<()> {
    let key = load_or_create_key()?;
    let mut kv = EncryptedKv::new();
    let bytes = bincode::serialize(store).map_err(io::Error::other)?;
    kv.set(TRUST_KV_KEY, bytes);
    kv.save(&paths::trust_file(), &key).map_err(io::Error::other)
}
