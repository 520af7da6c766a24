//! Store error types

use thiserror::Error;

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
    /// Trust database error
    #[error("trust store error: {0}")]
    Trust(String),
    /// Persistence error
    #[error("persistence error: {0}")]
    Persistence(String),
    /// Underlying crypto operation failed (KDF or AEAD)
    #[error(transparent)]
    Crypto(#[from] tallow_crypto::CryptoError),
    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),
    /// Deserialization error
    #[error("deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
