//! Per-peer relay session table
//!
//! A client connected to a room with N other peers runs one [`KeyExchange`]
//! per peer, landing in one [`SessionKey`] per peer. This module is just
//! the `(peer-id -> key)` map the spec calls for, plus rekeying on close.

use crate::ids::PeerId;
use crate::kex::SessionKey;
use std::collections::HashMap;

/// All of this client's per-peer relay session keys for one room.
#[derive(Default)]
pub struct PeerSessions {
    sessions: HashMap<PeerId, SessionKey>,
}

impl PeerSessions {
    /// Create an empty session table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (or replace) the session key for a peer, e.g. after completing
    /// a `key-exchange`.
    pub fn insert(&mut self, peer_id: PeerId, key: SessionKey) {
        self.sessions.insert(peer_id, key);
    }

    /// Look up a peer's session key.
    pub fn get(&self, peer_id: &PeerId) -> Option<&SessionKey> {
        self.sessions.get(peer_id)
    }

    /// Drop a peer's session key. Called on connection close; a rejoin
    /// triggers a fresh `key-exchange` and a new key rather than reuse.
    pub fn remove(&mut self, peer_id: &PeerId) {
        self.sessions.remove(peer_id);
    }

    /// Number of peers with an established session key.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether any session keys are established.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
