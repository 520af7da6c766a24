//! Symmetric encryption primitives
//!
//! AES-256-GCM is the fixed cipher for on-the-wire relay-mode chunk/text
//! encryption (the protocol doesn't negotiate a cipher suite). ChaCha20-
//! Poly1305 is kept for local-at-rest encryption of the client's persisted
//! trust store keyring, where a software-only cipher avoids depending on
//! AES-NI being present.

pub mod aes_gcm;
pub mod chacha20;

pub use aes_gcm::{decrypt as aes_decrypt, encrypt as aes_encrypt};
pub use chacha20::{decrypt as chacha_decrypt, encrypt as chacha_encrypt};
