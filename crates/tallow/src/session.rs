//! Room join and per-peer key-exchange flow shared by send/receive/chat
//!
//! Mirrors what a browser client does against the room server: connect,
//! `join`, read the roster back, then run one `key-exchange` per peer
//! before anything else is allowed onto the wire.

use std::time::Duration;

use base64::Engine as _;
use serde::Serialize;
use tallow_net::error::NetworkError;
use tallow_net::signaling::client::SignalingClient;
use tallow_protocol::ids::{PeerId, RoomCode};
use tallow_protocol::kex::{KeyExchange, SessionKey};
use tallow_protocol::room;
use tallow_protocol::wire::messages::{DeviceClass, JoinData, KeyExchangeData, RelayEnvelope, RosterPeer};

/// How long to wait for a second peer to join an otherwise-empty room.
const PEER_WAIT_TIMEOUT: Duration = Duration::from_secs(300);
/// How long to wait for a `key-exchange` reply from a peer.
const KEX_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything needed to join a room, gathered from CLI flags and config.
pub struct JoinOptions {
    pub signaling_url: String,
    pub room_code: String,
    pub password: Option<String>,
    pub display_name: String,
}

/// An open room membership: the signaling socket plus who's already here.
pub struct RoomSession {
    pub signaling: SignalingClient,
    pub self_id: PeerId,
    pub roster: Vec<RosterPeer>,
    pub room_code: RoomCode,
}

impl RoomSession {
    /// Normalize the room code, connect, send `join`, and return once the
    /// server's `joined` reply has been parsed.
    pub async fn join(opts: JoinOptions) -> Result<Self, NetworkError> {
        let room_code = room::normalize(&opts.room_code)
            .ok_or_else(|| NetworkError::NegotiationFailed("room code must be 4-16 alphanumeric characters".into()))?;

        let mut url = format!("{}/ws/{}", opts.signaling_url.trim_end_matches('/'), room_code);
        if let Some(password) = &opts.password {
            let hash = room::derive_password_hash(password, &room_code)?;
            url = format!("{url}?passwordHash={hash}");
        }

        let mut signaling = SignalingClient::new(url);
        signaling.connect().await?;

        let join = RelayEnvelope {
            kind: "join".to_string(),
            from: None,
            to: None,
            data: Some(
                serde_json::to_value(JoinData {
                    name: opts.display_name,
                    device_type: DeviceClass::Desktop,
                    browser_info: Some(format!("tallow-cli/{}", env!("CARGO_PKG_VERSION"))),
                })
                .expect("JoinData always serializes"),
            ),
        };
        signaling.send(&join).await?;

        let reply = signaling.receive().await?;
        if reply.kind != "joined" {
            return Err(NetworkError::JoinRejected(format!("expected joined, got {}", reply.kind)));
        }
        let data = reply
            .data
            .ok_or_else(|| NetworkError::NegotiationFailed("joined message carried no data".into()))?;

        #[derive(serde::Deserialize)]
        struct Joined {
            id: PeerId,
            peers: Vec<RosterPeer>,
        }
        let joined: Joined = serde_json::from_value(data).map_err(|e| NetworkError::NegotiationFailed(e.to_string()))?;

        Ok(Self { signaling, self_id: joined.id, roster: joined.peers, room_code })
    }

    /// Look up a roster entry by id, including peers that joined after us
    /// via `peer-joined` (the roster is only refreshed from `wait_for_peer`).
    pub fn roster_peer(&self, id: &PeerId) -> Option<&RosterPeer> {
        self.roster.iter().find(|p| &p.id == id)
    }

    /// Pick a target peer: the one already in the roster, or wait for the
    /// next `peer-joined` broadcast if the room was empty on join.
    pub async fn wait_for_peer(&mut self) -> Result<PeerId, NetworkError> {
        if let Some(existing) = self.roster.first() {
            return Ok(existing.id.clone());
        }

        #[derive(serde::Deserialize)]
        struct PeerJoined {
            id: PeerId,
        }

        let envelope = tokio::time::timeout(PEER_WAIT_TIMEOUT, self.wait_for_kind("peer-joined"))
            .await
            .map_err(|_| NetworkError::Timeout)??;
        let data = envelope
            .data
            .ok_or_else(|| NetworkError::NegotiationFailed("peer-joined carried no data".into()))?;
        let peer_joined: PeerJoined = serde_json::from_value(data).map_err(|e| NetworkError::NegotiationFailed(e.to_string()))?;
        Ok(peer_joined.id)
    }

    /// Run one X25519 key exchange with `peer` over the signaling channel.
    pub async fn key_exchange(&mut self, peer: &PeerId) -> Result<SessionKey, NetworkError> {
        let kex = KeyExchange::new();
        let our_public = kex.public_bytes();

        let envelope = RelayEnvelope {
            kind: "key-exchange".to_string(),
            from: None,
            to: Some(peer.clone()),
            data: Some(
                serde_json::to_value(KeyExchangeData {
                    public_key: base64::engine::general_purpose::STANDARD.encode(our_public),
                })
                .expect("KeyExchangeData always serializes"),
            ),
        };
        self.signaling.send(&envelope).await?;

        let reply = tokio::time::timeout(KEX_TIMEOUT, self.wait_for_kind("key-exchange"))
            .await
            .map_err(|_| NetworkError::Timeout)??;
        let data = reply
            .data
            .ok_or_else(|| NetworkError::NegotiationFailed("key-exchange carried no data".into()))?;
        let kex_data: KeyExchangeData = serde_json::from_value(data).map_err(|e| NetworkError::NegotiationFailed(e.to_string()))?;

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(kex_data.public_key)
            .map_err(|e| NetworkError::NegotiationFailed(e.to_string()))?;
        if decoded.len() != 32 {
            return Err(NetworkError::NegotiationFailed("key-exchange public key is not 32 bytes".into()));
        }
        let mut their_public = [0u8; 32];
        their_public.copy_from_slice(&decoded);

        Ok(kex.complete(&their_public))
    }

    /// Send a control-plane envelope of `kind` to `to`, JSON-encoding `data`.
    pub async fn send_control(&mut self, kind: &str, to: &PeerId, data: impl Serialize) -> Result<(), NetworkError> {
        let envelope = RelayEnvelope {
            kind: kind.to_string(),
            from: None,
            to: Some(to.clone()),
            data: Some(serde_json::to_value(data).map_err(|e| NetworkError::NegotiationFailed(e.to_string()))?),
        };
        self.signaling.send(&envelope).await
    }

    /// Wait for the next envelope of a given kind. See [`Self::wait_for_kind`].
    pub async fn recv_control(&mut self, kind: &str) -> Result<RelayEnvelope, NetworkError> {
        self.wait_for_kind(kind).await
    }

    /// Receive the next envelope of any kind, blocking until one arrives.
    pub async fn recv_any(&mut self) -> Result<RelayEnvelope, NetworkError> {
        self.signaling.receive().await
    }

    /// Wait for the next envelope of a given kind, discarding anything
    /// else that arrives first (roster churn, keepalives).
    async fn wait_for_kind(&mut self, kind: &str) -> Result<RelayEnvelope, NetworkError> {
        loop {
            let envelope = self.signaling.receive().await?;
            if envelope.kind == kind {
                return Ok(envelope);
            }
        }
    }
}
