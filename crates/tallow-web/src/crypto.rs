//! Wasm-bindgen wrappers over `tallow-crypto` and `tallow-protocol::kex`
//!
//! Every function here calls the exact same Rust code the CLI calls —
//! browser and native clients run identical cryptography, not a
//! reimplementation of it in JS.

use tallow_crypto::kem::x25519::X25519PublicKey;
use tallow_crypto::kem::X25519KeyPair;
use tallow_protocol::kex::KeyExchange;
use wasm_bindgen::prelude::*;
use zeroize::Zeroize;

// ---------------------------------------------------------------------------
// Per-peer-pair key exchange
// ---------------------------------------------------------------------------

/// One side's ephemeral X25519 key-exchange state, wrapping
/// `tallow_protocol::kex::KeyExchange` for JS.
#[wasm_bindgen]
pub struct WasmKeyExchange {
    inner: Option<KeyExchange>,
}

#[wasm_bindgen]
impl WasmKeyExchange {
    /// Generate a fresh ephemeral keypair to offer in a `key-exchange` message.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmKeyExchange {
        WasmKeyExchange {
            inner: Some(KeyExchange::new()),
        }
    }

    /// The public key bytes to send in the `key-exchange` message's
    /// `publicKey` field (base64-encode before sending; see
    /// [`blake3_hash`] for other encodings this crate leaves to JS).
    #[wasm_bindgen(js_name = "publicBytes")]
    pub fn public_bytes(&self) -> Result<Vec<u8>, JsValue> {
        let kex = self.inner.as_ref().ok_or_else(already_completed)?;
        Ok(kex.public_bytes().to_vec())
    }

    /// Complete the exchange once the peer's 32-byte public key arrives,
    /// deriving the shared relay-mode AEAD key. Consumes this object —
    /// a `WasmKeyExchange` is single-use, matching the Rust API.
    #[wasm_bindgen]
    pub fn complete(&mut self, their_public_bytes: &[u8]) -> Result<Vec<u8>, JsValue> {
        let bytes: [u8; 32] = their_public_bytes
            .try_into()
            .map_err(|_| JsValue::from_str("peer public key must be exactly 32 bytes"))?;
        let kex = self.inner.take().ok_or_else(already_completed)?;
        let session_key = kex.complete(&bytes);
        Ok(session_key.as_bytes().to_vec())
    }
}

impl Default for WasmKeyExchange {
    fn default() -> Self {
        Self::new()
    }
}

fn already_completed() -> JsValue {
    JsValue::from_str("key exchange already completed")
}

/// Raw X25519 keypair generation, for callers that need the keypair object
/// itself rather than the one-shot [`WasmKeyExchange`] flow.
#[wasm_bindgen(js_name = "x25519Generate")]
pub fn x25519_generate() -> Result<Vec<u8>, JsValue> {
    let keypair = X25519KeyPair::generate();
    bincode::serialize(&keypair).map_err(|e| JsValue::from_str(&format!("serialize keypair: {}", e)))
}

/// Diffie-Hellman over a bincode-serialized keypair and a raw 32-byte peer
/// public key. Returns the 32-byte shared secret.
#[wasm_bindgen(js_name = "x25519DiffieHellman")]
pub fn x25519_diffie_hellman(keypair_bytes: &[u8], their_public: &[u8]) -> Result<Vec<u8>, JsValue> {
    let keypair: X25519KeyPair =
        bincode::deserialize(keypair_bytes).map_err(|e| JsValue::from_str(&format!("deserialize keypair: {}", e)))?;
    let bytes: [u8; 32] = their_public
        .try_into()
        .map_err(|_| JsValue::from_str("peer public key must be exactly 32 bytes"))?;
    let shared = keypair.diffie_hellman(&X25519PublicKey::from(bytes));
    Ok(shared.0.to_vec())
}

// ---------------------------------------------------------------------------
// AES-256-GCM (relay-mode frame encryption)
// ---------------------------------------------------------------------------

/// Encrypt one relay-mode chunk or text payload.
///
/// Delegates to `tallow_protocol::transfer::crypto::encrypt_relay_payload`
/// so the nonce derivation (`BLAKE3(transfer_id || seq)`) matches the CLI
/// bit-for-bit; p2p-mode frames never reach this function since DTLS
/// already protects the data channel.
#[wasm_bindgen(js_name = "encryptRelayPayload")]
pub fn encrypt_relay_payload(session_key: &[u8], transfer_id: &[u8], seq: u32, plaintext: &[u8]) -> Result<Vec<u8>, JsValue> {
    let key: [u8; 32] = session_key
        .try_into()
        .map_err(|_| JsValue::from_str("session_key must be exactly 32 bytes"))?;
    let tid = parse_transfer_id(transfer_id)?;
    tallow_protocol::transfer::crypto::encrypt_relay_payload(&key, tid, seq, plaintext)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decrypt one relay-mode chunk or text payload. See [`encrypt_relay_payload`].
#[wasm_bindgen(js_name = "decryptRelayPayload")]
pub fn decrypt_relay_payload(session_key: &[u8], transfer_id: &[u8], seq: u32, ciphertext: &[u8]) -> Result<Vec<u8>, JsValue> {
    let key: [u8; 32] = session_key
        .try_into()
        .map_err(|_| JsValue::from_str("session_key must be exactly 32 bytes"))?;
    let tid = parse_transfer_id(transfer_id)?;
    tallow_protocol::transfer::crypto::decrypt_relay_payload(&key, tid, seq, ciphertext)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_transfer_id(bytes: &[u8]) -> Result<tallow_protocol::ids::TransferId, JsValue> {
    let arr: [u8; 16] = bytes
        .try_into()
        .map_err(|_| JsValue::from_str("transfer_id must be exactly 16 bytes"))?;
    Ok(tallow_protocol::ids::TransferId(arr))
}

// ---------------------------------------------------------------------------
// BLAKE3 / HKDF
// ---------------------------------------------------------------------------

/// Compute a 32-byte BLAKE3 hash of the input data.
#[wasm_bindgen(js_name = "blake3Hash")]
pub fn blake3_hash(data: &[u8]) -> Vec<u8> {
    tallow_crypto::hash::blake3::hash(data).to_vec()
}

/// Derive key material using HKDF-SHA256.
#[wasm_bindgen(js_name = "hkdfDerive")]
pub fn hkdf_derive(ikm: &[u8], salt: &[u8], info: &[u8], output_len: u32) -> Result<Vec<u8>, JsValue> {
    tallow_crypto::kdf::hkdf::derive(salt, ikm, info, output_len as usize).map_err(|e| JsValue::from_str(&e.to_string()))
}

// ---------------------------------------------------------------------------
// Room password hashing
// ---------------------------------------------------------------------------

/// Derive the password hash sent to the room server on join, matching
/// `tallow_protocol::room::password::derive_password_hash` exactly.
#[wasm_bindgen(js_name = "derivePasswordHash")]
pub fn derive_password_hash(password: &str, room_code: &str) -> Result<String, JsValue> {
    let code = tallow_protocol::room::normalize(room_code)
        .ok_or_else(|| JsValue::from_str("room code must be 4-16 alphanumeric characters"))?;
    tallow_protocol::room::password::derive_password_hash(password, &code).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Securely zero a byte buffer in place, e.g. a session key JS is done with.
#[wasm_bindgen(js_name = "wipeBytes")]
pub fn wipe_bytes(mut buf: Vec<u8>) -> Vec<u8> {
    buf.zeroize();
    buf
}
