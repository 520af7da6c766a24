//! WebSocket signaling client
//!
//! Connects to the room server, speaks [`RelayEnvelope`] JSON text frames
//! over the socket, and exposes a plain `send`/`receive` pair. Reconnection
//! policy lives one layer up in [`crate::pcm::reconnect`] — this client is
//! deliberately dumb about retries so that policy can be swapped or tested
//! independently of the transport.

use crate::{NetworkError, Result};
use futures::{SinkExt, StreamExt};
use tallow_protocol::wire::messages::RelayEnvelope;
use tokio::net::TcpStream;
use tokio_tungstenite::{tungstenite::Message, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A connected signaling session with the room server.
pub struct SignalingClient {
    server_url: String,
    stream: Option<WsStream>,
}

impl SignalingClient {
    /// Create a client targeting `server_url` (e.g. `wss://relay.example.com/ws`).
    /// Call [`Self::connect`] before sending or receiving.
    pub fn new(server_url: String) -> Self {
        Self {
            server_url,
            stream: None,
        }
    }

    /// Whether the socket is currently connected.
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Open the WebSocket connection to the room server.
    pub async fn connect(&mut self) -> Result<()> {
        let (stream, _response) = tokio_tungstenite::connect_async(&self.server_url)
            .await
            .map_err(|e| NetworkError::SignalingConnect(e.to_string()))?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Send one envelope as a JSON text frame.
    pub async fn send(&mut self, msg: &RelayEnvelope) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(NetworkError::SignalingClosed)?;
        let json = serde_json::to_string(msg)
            .map_err(|e| NetworkError::SignalingConnect(e.to_string()))?;
        stream
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| NetworkError::SignalingConnect(e.to_string()))
    }

    /// Receive the next envelope, blocking until one arrives.
    ///
    /// Returns [`NetworkError::SignalingClosed`] once the peer closes the
    /// socket or the stream ends.
    pub async fn receive(&mut self) -> Result<RelayEnvelope> {
        loop {
            let stream = self.stream.as_mut().ok_or(NetworkError::SignalingClosed)?;
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    let envelope: RelayEnvelope = serde_json::from_str(&text)
                        .map_err(|e| NetworkError::SignalingConnect(e.to_string()))?;
                    return Ok(envelope);
                }
                // Pings/pongs/binary frames carry no envelope; keep waiting.
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Binary(_) | Message::Frame(_))) => {
                    continue;
                }
                Some(Ok(Message::Close(_))) | None => {
                    self.stream = None;
                    return Err(NetworkError::SignalingClosed);
                }
                Some(Err(e)) => {
                    self.stream = None;
                    return Err(NetworkError::SignalingConnect(e.to_string()));
                }
            }
        }
    }

    /// Close the connection gracefully.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.close(None).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected() {
        let client = SignalingClient::new("wss://example.invalid/ws".to_string());
        assert!(!client.is_connected());
    }
}
