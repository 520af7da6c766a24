//! Trust management and TOFU

pub mod fingerprint;
pub mod levels;
pub mod tofu;

pub use fingerprint::Fingerprint;
pub use levels::TrustLevel;
pub use tofu::{TrustRecord, TrustStore};
