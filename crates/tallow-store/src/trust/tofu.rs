//! Trust-on-first-contact device records
//!
//! The first time a peer is seen, it's recorded at [`TrustLevel::Seen`].
//! A user can later promote it to `Trusted` (skip confirmation dialogs
//! for future transfers) or `Verified` (confirmed out-of-band). Nothing
//! here performs cryptographic verification — see [`super::fingerprint`]
//! for why the key used to look a record up is a display-only label, not
//! an identity key.

use super::{Fingerprint, TrustLevel};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tallow_protocol::wire::messages::DeviceClass;

/// A remembered device.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TrustRecord {
    /// Display name the peer last joined with.
    pub name: String,
    /// Device class the peer last reported.
    pub device_type: DeviceClass,
    /// Browser info the peer last reported, if any.
    pub browser_info: Option<String>,
    /// Current trust level.
    pub level: TrustLevel,
    /// When this record was first created.
    pub trusted_at: DateTime<Utc>,
}

/// In-memory trust database, keyed by [`Fingerprint`].
///
/// Persisted to disk via [`crate::persistence::EncryptedKv`] under the
/// `"trust"` key by whichever layer owns the store's lifecycle; this type
/// itself has no file I/O.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct TrustStore {
    records: HashMap<[u8; 4], TrustRecord>,
}

impl TrustStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or re-confirm) first contact with a peer, returning its
    /// fingerprint. A peer already on file keeps its existing trust level
    /// and `trusted_at`; only its display fields are refreshed.
    pub fn record_contact(
        &mut self,
        name: &str,
        device_type: DeviceClass,
        browser_info: Option<&str>,
    ) -> Fingerprint {
        let fp = Fingerprint::derive(name, device_type, browser_info);
        self.records
            .entry(fp.0)
            .and_modify(|r| {
                r.name = name.to_string();
                r.device_type = device_type;
                r.browser_info = browser_info.map(str::to_string);
            })
            .or_insert_with(|| TrustRecord {
                name: name.to_string(),
                device_type,
                browser_info: browser_info.map(str::to_string),
                level: TrustLevel::Seen,
                trusted_at: Utc::now(),
            });
        fp
    }

    /// Promote (or demote) a known fingerprint's trust level. No-op if the
    /// fingerprint isn't on file.
    pub fn set_level(&mut self, fp: Fingerprint, level: TrustLevel) {
        if let Some(record) = self.records.get_mut(&fp.0) {
            record.level = level;
        }
    }

    /// Look up a fingerprint's current trust level, `Unknown` if unseen.
    pub fn level(&self, fp: Fingerprint) -> TrustLevel {
        self.records.get(&fp.0).map(|r| r.level).unwrap_or(TrustLevel::Unknown)
    }

    /// Fetch the full record for a fingerprint, if any.
    pub fn get(&self, fp: Fingerprint) -> Option<&TrustRecord> {
        self.records.get(&fp.0)
    }

    /// Forget a device entirely.
    pub fn forget(&mut self, fp: Fingerprint) -> bool {
        self.records.remove(&fp.0).is_some()
    }

    /// All records, for listing in a UI.
    pub fn iter(&self) -> impl Iterator<Item = (Fingerprint, &TrustRecord)> {
        self.records.iter().map(|(k, v)| (Fingerprint(*k), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_contact_is_seen() {
        let mut store = TrustStore::new();
        let fp = store.record_contact("alice", DeviceClass::Desktop, None);
        assert_eq!(store.level(fp), TrustLevel::Seen);
    }

    #[test]
    fn unknown_fingerprint_reports_unknown() {
        let store = TrustStore::new();
        let fp = Fingerprint::derive("ghost", DeviceClass::Desktop, None);
        assert_eq!(store.level(fp), TrustLevel::Unknown);
    }

    #[test]
    fn promotion_sticks_across_recontact() {
        let mut store = TrustStore::new();
        let fp = store.record_contact("alice", DeviceClass::Desktop, None);
        store.set_level(fp, TrustLevel::Trusted);
        // Same peer joins again later.
        let fp2 = store.record_contact("alice", DeviceClass::Desktop, None);
        assert_eq!(fp, fp2);
        assert_eq!(store.level(fp2), TrustLevel::Trusted);
    }

    #[test]
    fn forget_removes_record() {
        let mut store = TrustStore::new();
        let fp = store.record_contact("alice", DeviceClass::Desktop, None);
        assert!(store.forget(fp));
        assert_eq!(store.level(fp), TrustLevel::Unknown);
    }
}
