//! Room membership for the relay server
//!
//! A room is keyed by its [`RoomCode`] and holds a roster of connected
//! peers plus, optionally, the password hash the room was created with.
//! The relay only ever sees opaque message envelopes — it routes by `type`
//! and `to`, never inspecting payloads meant for the peers themselves.

use dashmap::DashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tallow_protocol::ids::{PeerId, RoomCode};
use tallow_protocol::wire::messages::{DeviceClass, RelayEnvelope, RosterPeer};
use tokio::sync::mpsc;

/// Channel used to push an envelope to a connected peer's WebSocket task.
pub type PeerSender = mpsc::Sender<RelayEnvelope>;

/// A connected or recently-disconnected member of a room.
struct RoomPeer {
    sender: PeerSender,
    name: String,
    device_type: DeviceClass,
    browser_info: Option<String>,
}

/// One room's live state.
pub struct Room {
    peers: std::collections::HashMap<PeerId, RoomPeer>,
    /// Password hash the room was created with, if any. `None` means open.
    password_hash: Option<String>,
    capacity: u8,
    pub last_activity: Instant,
}

impl Room {
    fn new(capacity: u8, password_hash: Option<String>) -> Self {
        Self {
            peers: std::collections::HashMap::new(),
            password_hash,
            capacity,
            last_activity: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    fn roster(&self) -> Vec<RosterPeer> {
        self.peers
            .iter()
            .map(|(id, p)| RosterPeer {
                id: id.clone(),
                name: p.name.clone(),
                device_type: p.device_type,
                browser_info: p.browser_info.clone(),
            })
            .collect()
    }

    fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

/// Errors from room operations.
#[derive(Debug)]
pub enum RoomError {
    /// Room already has its full complement of peers.
    RoomFull,
    /// Too many concurrent rooms on this server.
    TooManyRooms,
    /// Too many rooms already created from this IP.
    TooManyRoomsPerIp,
    /// The room requires a password and none (or the wrong one) was given.
    PasswordRequired,
    /// The supplied password hash didn't match the room's.
    PasswordIncorrect,
}

impl std::fmt::Display for RoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RoomFull => write!(f, "room is full"),
            Self::TooManyRooms => write!(f, "server at room capacity"),
            Self::TooManyRoomsPerIp => write!(f, "too many rooms from this IP"),
            Self::PasswordRequired => write!(f, "password required"),
            Self::PasswordIncorrect => write!(f, "incorrect password"),
        }
    }
}

impl std::error::Error for RoomError {}

/// The outcome of successfully joining a room.
pub struct JoinOutcome {
    /// This peer's assigned id.
    pub peer_id: PeerId,
    /// Everyone else already in the room.
    pub roster: Vec<RosterPeer>,
}

/// Tracks every live room on this server.
pub struct RoomManager {
    rooms: Arc<DashMap<RoomCode, Room>>,
    max_rooms: usize,
    max_peers_per_room: u8,
    ip_room_counts: Arc<DashMap<IpAddr, usize>>,
    max_rooms_per_ip: usize,
}

impl RoomManager {
    /// Create a manager with the given global limits.
    pub fn new(max_rooms: usize, max_peers_per_room: u8) -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            max_rooms,
            max_peers_per_room,
            ip_room_counts: Arc::new(DashMap::new()),
            max_rooms_per_ip: 50,
        }
    }

    /// Join `room_code`, creating it if it doesn't exist yet.
    ///
    /// The first peer to join a room sets its password (or leaves it open);
    /// every later joiner must supply a hash matching that first one.
    pub fn join(
        &self,
        room_code: RoomCode,
        name: String,
        device_type: DeviceClass,
        browser_info: Option<String>,
        password_hash: Option<String>,
        requested_capacity: u8,
        client_ip: Option<IpAddr>,
    ) -> Result<(JoinOutcome, PeerSender, mpsc::Receiver<RelayEnvelope>), RoomError> {
        if let Some(ip) = client_ip {
            let ip_count = self.ip_room_counts.get(&ip).map(|v| *v).unwrap_or(0);
            if ip_count >= self.max_rooms_per_ip && !self.rooms.contains_key(&room_code) {
                return Err(RoomError::TooManyRoomsPerIp);
            }
        }

        if self.rooms.len() >= self.max_rooms && !self.rooms.contains_key(&room_code) {
            return Err(RoomError::TooManyRooms);
        }

        use dashmap::mapref::entry::Entry;
        let (tx, rx) = mpsc::channel(256);
        let peer_id = PeerId::generate();

        let outcome = match self.rooms.entry(room_code) {
            Entry::Occupied(mut entry) => {
                let room = entry.get_mut();
                if room.password_hash.is_some()
                    && !crate::auth::check(room.password_hash.as_deref(), password_hash.as_deref())
                {
                    return Err(if password_hash.is_none() {
                        RoomError::PasswordRequired
                    } else {
                        RoomError::PasswordIncorrect
                    });
                }
                if room.peers.len() >= room.capacity as usize {
                    return Err(RoomError::RoomFull);
                }
                let roster = room.roster();
                room.peers.insert(
                    peer_id.clone(),
                    RoomPeer {
                        sender: tx.clone(),
                        name,
                        device_type,
                        browser_info,
                    },
                );
                room.touch();
                JoinOutcome { peer_id: peer_id.clone(), roster }
            }
            Entry::Vacant(entry) => {
                let capacity = if requested_capacity == 0 {
                    self.max_peers_per_room
                } else {
                    requested_capacity.min(self.max_peers_per_room)
                };
                let mut room = Room::new(capacity, password_hash);
                room.peers.insert(
                    peer_id.clone(),
                    RoomPeer {
                        sender: tx.clone(),
                        name,
                        device_type,
                        browser_info,
                    },
                );
                entry.insert(room);

                if let Some(ip) = client_ip {
                    *self.ip_room_counts.entry(ip).or_insert(0) += 1;
                }
                JoinOutcome { peer_id: peer_id.clone(), roster: Vec::new() }
            }
        };

        Ok((outcome, tx, rx))
    }

    /// Broadcast `envelope` to every peer in `room_code` except `from`.
    pub fn broadcast_except(&self, room_code: &RoomCode, from: &PeerId, envelope: RelayEnvelope) {
        if let Some(room) = self.rooms.get(room_code) {
            for (id, peer) in room.peers.iter() {
                if id != from {
                    let _ = peer.sender.try_send(envelope.clone());
                }
            }
        }
    }

    /// Forward `envelope` to exactly one named peer, dropping silently if
    /// that peer isn't connected.
    pub fn forward_to(&self, room_code: &RoomCode, to: &PeerId, envelope: RelayEnvelope) {
        if let Some(room) = self.rooms.get(room_code) {
            if let Some(peer) = room.peers.get(to) {
                let _ = peer.sender.try_send(envelope);
            }
        }
    }

    /// Update a room's last-activity timestamp.
    pub fn touch(&self, room_code: &RoomCode) {
        if let Some(mut room) = self.rooms.get_mut(room_code) {
            room.touch();
        }
    }

    /// Remove a peer from a room, tearing the room down if it's now empty.
    pub fn leave(&self, room_code: &RoomCode, peer_id: &PeerId, client_ip: Option<IpAddr>) {
        let should_remove = if let Some(mut room) = self.rooms.get_mut(room_code) {
            room.peers.remove(peer_id);
            room.is_empty()
        } else {
            false
        };

        if should_remove {
            self.rooms.remove(room_code);
        }

        if let Some(ip) = client_ip {
            if let Some(mut count) = self.ip_room_counts.get_mut(&ip) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    drop(count);
                    self.ip_room_counts.remove(&ip);
                }
            }
        }
    }

    /// Tear down rooms idle longer than `max_idle_secs`. Returns the count removed.
    pub fn cleanup_stale(&self, max_idle_secs: u64) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.rooms.retain(|_code, room| {
            if now.duration_since(room.last_activity).as_secs() > max_idle_secs {
                removed += 1;
                false
            } else {
                true
            }
        });
        self.ip_room_counts.retain(|_ip, count| *count > 0);
        removed
    }

    /// Number of active rooms.
    #[cfg(test)]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> RoomCode {
        tallow_protocol::room::normalize(s).unwrap()
    }

    fn join_default(
        manager: &RoomManager,
        room: RoomCode,
    ) -> Result<(JoinOutcome, PeerSender, mpsc::Receiver<RelayEnvelope>), RoomError> {
        manager.join(room, "alice".to_string(), DeviceClass::Desktop, None, None, 0, None)
    }

    #[test]
    fn first_peer_gets_empty_roster() {
        let manager = RoomManager::new(100, 10);
        let (outcome, _tx, _rx) = join_default(&manager, code("AAAA")).unwrap();
        assert!(outcome.roster.is_empty());
    }

    #[test]
    fn second_peer_sees_first_in_roster() {
        let manager = RoomManager::new(100, 10);
        let room = code("AAAA");
        join_default(&manager, room.clone()).unwrap();
        let (outcome, _tx, _rx) = join_default(&manager, room).unwrap();
        assert_eq!(outcome.roster.len(), 1);
    }

    #[test]
    fn room_full_rejects_extra_peers() {
        let manager = RoomManager::new(100, 1);
        let room = code("AAAA");
        join_default(&manager, room.clone()).unwrap();
        assert!(matches!(join_default(&manager, room), Err(RoomError::RoomFull)));
    }

    #[test]
    fn password_required_when_room_has_one() {
        let manager = RoomManager::new(100, 10);
        let room = code("AAAA");
        manager
            .join(room.clone(), "a".to_string(), DeviceClass::Desktop, None, Some("hash1".to_string()), 0, None)
            .unwrap();
        let result = manager.join(room, "b".to_string(), DeviceClass::Desktop, None, None, 0, None);
        assert!(matches!(result, Err(RoomError::PasswordRequired)));
    }

    #[test]
    fn password_incorrect_rejected() {
        let manager = RoomManager::new(100, 10);
        let room = code("AAAA");
        manager
            .join(room.clone(), "a".to_string(), DeviceClass::Desktop, None, Some("hash1".to_string()), 0, None)
            .unwrap();
        let result = manager.join(
            room,
            "b".to_string(),
            DeviceClass::Desktop,
            None,
            Some("hash2".to_string()),
            0,
            None,
        );
        assert!(matches!(result, Err(RoomError::PasswordIncorrect)));
    }

    #[test]
    fn matching_password_is_accepted() {
        let manager = RoomManager::new(100, 10);
        let room = code("AAAA");
        manager
            .join(room.clone(), "a".to_string(), DeviceClass::Desktop, None, Some("hash1".to_string()), 0, None)
            .unwrap();
        let result = manager.join(
            room,
            "b".to_string(),
            DeviceClass::Desktop,
            None,
            Some("hash1".to_string()),
            0,
            None,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn leaving_empty_room_removes_it() {
        let manager = RoomManager::new(100, 10);
        let room = code("AAAA");
        let (outcome, _tx, _rx) = join_default(&manager, room.clone()).unwrap();
        manager.leave(&room, &outcome.peer_id, None);
        assert_eq!(manager.room_count(), 0);
    }

    #[test]
    fn too_many_rooms_rejected() {
        let manager = RoomManager::new(1, 10);
        join_default(&manager, code("AAAA")).unwrap();
        assert!(matches!(join_default(&manager, code("BBBB")), Err(RoomError::TooManyRooms)));
    }

    #[test]
    fn cleanup_stale_leaves_fresh_rooms() {
        let manager = RoomManager::new(100, 10);
        join_default(&manager, code("AAAA")).unwrap();
        assert_eq!(manager.cleanup_stale(60), 0);
        assert_eq!(manager.room_count(), 1);
    }
}
