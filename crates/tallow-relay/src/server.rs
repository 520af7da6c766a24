//! Relay server lifecycle
//!
//! Owns the room manager, binds the WebSocket listener, and runs the
//! background stale-room sweep alongside it.

use crate::config::RelayConfig;
use crate::rate_limit::RateLimiter;
use crate::room::RoomManager;
use crate::websocket::{router, WsState};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

/// The room server.
pub struct RelayServer {
    config: RelayConfig,
    room_manager: Arc<RoomManager>,
}

impl RelayServer {
    /// Build a server from `config`.
    pub fn new(config: RelayConfig) -> Self {
        let room_manager = Arc::new(RoomManager::new(config.max_rooms, config.max_peers_per_room));
        Self { config, room_manager }
    }

    /// Bind the listener and serve until the process is signalled to stop.
    pub async fn run(self) -> std::io::Result<()> {
        let addr: SocketAddr = self
            .config
            .ws_bind_addr
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{e}")))?;

        self.spawn_cleanup_task();

        let state = Arc::new(WsState {
            room_manager: Arc::clone(&self.room_manager),
            rate_limiter: Mutex::new(RateLimiter::new(self.config.rate_limit)),
        });
        let app = router(state);

        info!(%addr, "relay server listening");
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }

    fn spawn_cleanup_task(&self) {
        let room_manager = Arc::clone(&self.room_manager);
        let idle_secs = self.config.room_timeout_secs;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(30));
            loop {
                interval.tick().await;
                let removed = room_manager.cleanup_stale(idle_secs);
                if removed > 0 {
                    tracing::debug!(removed, "swept stale rooms");
                }
            }
        });
    }
}
