//! WebSocket transport for the room server
//!
//! Runs an axum HTTP server that upgrades `GET /ws/:room_code` to a
//! WebSocket and speaks [`RelayEnvelope`] JSON text frames from then on.
//! The relay only reads `type` and `to` to decide where a message goes —
//! [`FORWARDABLE_KINDS`] get routed to one named peer, [`BROADCAST_KINDS`]
//! go to everyone else in the room, and anything else is dropped.

use axum::{
    extract::ws::{Message as WsMsg, WebSocket, WebSocketUpgrade},
    extract::{ConnectInfo, Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tallow_protocol::ids::PeerId;
use tallow_protocol::wire::messages::{ErrorData, JoinData, RelayEnvelope};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

use crate::rate_limit::RateLimiter;
use crate::room::RoomManager;
use crate::signaling::{classify, Route};
use std::sync::Mutex;

/// Timeout for the initial join message after the socket upgrades.
const JOIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared state for the WebSocket handlers.
pub struct WsState {
    pub room_manager: Arc<RoomManager>,
    pub rate_limiter: Mutex<RateLimiter>,
}

#[derive(Deserialize)]
struct JoinQuery {
    #[serde(rename = "passwordHash")]
    password_hash: Option<String>,
    capacity: Option<u8>,
}

/// Build the axum router: `/ws/:room_code` upgrade, `/health` check.
///
/// CORS is permissive — the relay only forwards opaque, already-encrypted
/// bytes, so there is nothing for an origin check to protect.
pub fn router(state: Arc<WsState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws/{room_code}", get(ws_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(cors)
        .with_state(state)
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(room_code): Path<String>,
    Query(query): Query<JoinQuery>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<WsState>>,
) -> axum::response::Response {
    let client_ip = addr.ip();
    let allowed = state
        .rate_limiter
        .lock()
        .expect("rate limiter mutex poisoned")
        .check(client_ip);
    if !allowed {
        return axum::http::StatusCode::TOO_MANY_REQUESTS.into_response();
    }
    ws.on_upgrade(move |socket| handle_client(socket, state, room_code, query, Some(client_ip)))
        .into_response()
}

async fn handle_client(
    socket: WebSocket,
    state: Arc<WsState>,
    room_code_raw: String,
    query: JoinQuery,
    client_ip: Option<IpAddr>,
) {
    let (mut sink, mut stream) = socket.split();

    let room_code = match tallow_protocol::room::normalize(&room_code_raw) {
        Some(c) => c,
        None => {
            let _ = send_error(&mut sink, "PASSWORD_INCORRECT", "invalid room code").await;
            return;
        }
    };

    let join_data = match tokio::time::timeout(JOIN_TIMEOUT, read_join(&mut stream)).await {
        Ok(Some(data)) => data,
        _ => return,
    };

    let (outcome, tx, mut rx) = match state.room_manager.join(
        room_code.clone(),
        join_data.name,
        join_data.device_type,
        join_data.browser_info,
        query.password_hash,
        query.capacity.unwrap_or(0),
        client_ip,
    ) {
        Ok(v) => v,
        Err(e) => {
            let code = match e {
                crate::room::RoomError::PasswordRequired => "PASSWORD_REQUIRED",
                crate::room::RoomError::PasswordIncorrect => "PASSWORD_INCORRECT",
                _ => "ROOM_FULL",
            };
            let _ = send_error(&mut sink, code, &e.to_string()).await;
            return;
        }
    };
    drop(tx);

    info!(room = %room_code, peer = %outcome.peer_id, "peer joined");

    let joined = RelayEnvelope {
        kind: "joined".to_string(),
        from: None,
        to: None,
        data: Some(serde_json::json!({ "id": outcome.peer_id, "peers": outcome.roster })),
    };
    if send(&mut sink, &joined).await.is_err() {
        state.room_manager.leave(&room_code, &outcome.peer_id, client_ip);
        return;
    }

    state.room_manager.broadcast_except(
        &room_code,
        &outcome.peer_id,
        RelayEnvelope {
            kind: "peer-joined".to_string(),
            from: None,
            to: None,
            data: Some(serde_json::json!({ "id": outcome.peer_id })),
        },
    );

    bridge(&mut sink, &mut stream, &mut rx, &state.room_manager, &room_code, &outcome.peer_id).await;

    debug!(room = %room_code, peer = %outcome.peer_id, "peer left");
    state.room_manager.leave(&room_code, &outcome.peer_id, client_ip);
    state.room_manager.broadcast_except(
        &room_code,
        &outcome.peer_id,
        RelayEnvelope {
            kind: "peer-left".to_string(),
            from: None,
            to: None,
            data: Some(serde_json::json!({ "id": outcome.peer_id })),
        },
    );
}

async fn read_join(
    stream: &mut futures::stream::SplitStream<WebSocket>,
) -> Option<JoinData> {
    while let Some(msg) = stream.next().await {
        match msg {
            Ok(WsMsg::Text(text)) => {
                let envelope: RelayEnvelope = serde_json::from_str(&text).ok()?;
                if envelope.kind != "join" {
                    return None;
                }
                let data = envelope.data?;
                return serde_json::from_value(data).ok();
            }
            Ok(WsMsg::Ping(_)) | Ok(WsMsg::Pong(_)) => continue,
            _ => return None,
        }
    }
    None
}

/// Bridge a peer's WebSocket to the room: client-sent envelopes are routed
/// by `type`/`to`, room-routed envelopes (from other peers) are written
/// straight back out as JSON text frames.
async fn bridge(
    sink: &mut futures::stream::SplitSink<WebSocket, WsMsg>,
    stream: &mut futures::stream::SplitStream<WebSocket>,
    rx: &mut tokio::sync::mpsc::Receiver<RelayEnvelope>,
    room_manager: &Arc<RoomManager>,
    room_code: &tallow_protocol::ids::RoomCode,
    peer_id: &PeerId,
) {
    loop {
        tokio::select! {
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(WsMsg::Text(text))) => {
                        let Ok(mut envelope) = serde_json::from_str::<RelayEnvelope>(&text) else { continue };
                        envelope.from = Some(peer_id.clone());
                        match classify(&envelope.kind) {
                            Route::Forward => {
                                if let Some(to) = envelope.to.clone() {
                                    room_manager.forward_to(room_code, &to, envelope);
                                    room_manager.touch(room_code);
                                }
                            }
                            Route::Broadcast => {
                                room_manager.broadcast_except(room_code, peer_id, envelope);
                                room_manager.touch(room_code);
                            }
                            Route::Drop => {
                                warn!(kind = %envelope.kind, "dropping unroutable message kind");
                            }
                        }
                    }
                    Some(Ok(WsMsg::Ping(_))) | Some(Ok(WsMsg::Pong(_))) => continue,
                    _ => break,
                }
            }
            outgoing = rx.recv() => {
                match outgoing {
                    Some(envelope) => {
                        if send(sink, &envelope).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }
}

async fn send(
    sink: &mut futures::stream::SplitSink<WebSocket, WsMsg>,
    envelope: &RelayEnvelope,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(envelope).unwrap_or_default();
    sink.send(WsMsg::Text(json.into())).await
}

async fn send_error(
    sink: &mut futures::stream::SplitSink<WebSocket, WsMsg>,
    code: &str,
    _detail: &str,
) -> Result<(), axum::Error> {
    let envelope = RelayEnvelope {
        kind: "error".to_string(),
        from: None,
        to: None,
        data: Some(serde_json::to_value(ErrorData { error: code.to_string() }).unwrap()),
    };
    send(sink, &envelope).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_builds_without_panicking() {
        let room_manager = Arc::new(RoomManager::new(100, 10));
        let state = Arc::new(WsState {
            room_manager,
            rate_limiter: Mutex::new(RateLimiter::new(100)),
        });
        let _router = router(state);
    }

    #[tokio::test]
    async fn health_endpoint_returns_200() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode};
        use tower::ServiceExt;

        let room_manager = Arc::new(RoomManager::new(100, 10));
        let state = Arc::new(WsState {
            room_manager,
            rate_limiter: Mutex::new(RateLimiter::new(100)),
        });
        let app = router(state);

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
