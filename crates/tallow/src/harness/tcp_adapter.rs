//! A real-socket stand-in for [`HostAdapter`], used by integration tests
//!
//! `tallow-net`'s `LoopbackAdapter` proves the trait shape is usable; it
//! never touches a socket. This type is the thing that actually exercises
//! negotiation/transfer logic end to end: two CLI processes (or two tasks
//! in one test) dial a real TCP connection and push data-channel frames
//! across it exactly as `send_on_data_channel`/`poll_data_channel` specify.
//! Offer/answer/ICE are no-ops here, the same way they are for the
//! loopback adapter — there's no SDP/ICE machinery to negotiate against
//! over a plain socket, and PCM's role logic is exercised separately from
//! this seam.

use std::io;

use bytes::Bytes;
use futures::{FutureExt, SinkExt, StreamExt};
use tallow_net::pcm::host_adapter::HostAdapter;
use tallow_protocol::ids::PeerId;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::{FramedRead, FramedWrite, LengthDelimitedCodec};

/// One end of a TCP-backed data channel to a single peer.
pub struct TcpHostAdapter {
    peer: PeerId,
    reader: FramedRead<OwnedReadHalf, LengthDelimitedCodec>,
    writer: FramedWrite<OwnedWriteHalf, LengthDelimitedCodec>,
}

impl TcpHostAdapter {
    fn from_stream(peer: PeerId, stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            peer,
            reader: FramedRead::new(read_half, LengthDelimitedCodec::new()),
            writer: FramedWrite::new(write_half, LengthDelimitedCodec::new()),
        }
    }

    /// Dial out to a listening peer.
    pub async fn connect(peer: PeerId, addr: std::net::SocketAddr) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::from_stream(peer, stream))
    }

    /// Accept a single incoming connection from a peer.
    pub async fn accept(peer: PeerId, listener: &TcpListener) -> io::Result<Self> {
        let (stream, _) = listener.accept().await?;
        Ok(Self::from_stream(peer, stream))
    }
}

impl HostAdapter for TcpHostAdapter {
    type Error = io::Error;

    async fn create_offer(&mut self, _peer: &PeerId) -> Result<String, io::Error> {
        Ok("v=0 tcp-harness-offer".to_string())
    }

    async fn create_answer(&mut self, _peer: &PeerId, _offer_sdp: &str) -> Result<String, io::Error> {
        Ok("v=0 tcp-harness-answer".to_string())
    }

    async fn set_remote_description(&mut self, _peer: &PeerId, _sdp: &str) -> Result<(), io::Error> {
        Ok(())
    }

    async fn add_ice_candidate(&mut self, _peer: &PeerId, _candidate: &str) -> Result<(), io::Error> {
        Ok(())
    }

    async fn send_on_data_channel(&mut self, peer: &PeerId, frame: &[u8]) -> Result<(), io::Error> {
        if peer != &self.peer {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no data channel open to that peer"));
        }
        self.writer.send(Bytes::copy_from_slice(frame)).await
    }

    async fn poll_data_channel(&mut self, peer: &PeerId) -> Result<Option<Vec<u8>>, io::Error> {
        if peer != &self.peer {
            return Ok(None);
        }
        match self.reader.next().now_or_never() {
            Some(Some(Ok(bytes))) => Ok(Some(bytes.to_vec())),
            Some(Some(Err(e))) => Err(e),
            Some(None) => Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer closed the data channel")),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frames_roundtrip_over_a_real_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let peer = PeerId::from("peer");

        let server = tokio::spawn({
            let peer = peer.clone();
            async move { TcpHostAdapter::accept(peer, &listener).await.unwrap() }
        });
        let mut client = TcpHostAdapter::connect(peer.clone(), addr).await.unwrap();
        let mut server = server.await.unwrap();

        client.send_on_data_channel(&peer, b"hello from client").await.unwrap();

        let received = loop {
            if let Some(frame) = server.poll_data_channel(&peer).await.unwrap() {
                break frame;
            }
        };
        assert_eq!(received, b"hello from client");
    }

    #[tokio::test]
    async fn poll_on_empty_socket_returns_none_without_blocking() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let peer = PeerId::from("peer");

        let server = tokio::spawn({
            let peer = peer.clone();
            async move { TcpHostAdapter::accept(peer, &listener).await.unwrap() }
        });
        let client = TcpHostAdapter::connect(peer.clone(), addr).await.unwrap();
        let mut server = server.await.unwrap();
        drop(client);

        // Give the connection a moment to establish before polling; no data
        // was sent, so this must come back empty rather than hang.
        let result = server.poll_data_channel(&peer).await;
        assert!(matches!(result, Ok(None) | Err(_)));
    }

    #[tokio::test]
    async fn send_to_unknown_peer_errors() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let peer = PeerId::from("peer");

        let server = tokio::spawn({
            let peer = peer.clone();
            async move { TcpHostAdapter::accept(peer, &listener).await.unwrap() }
        });
        let mut client = TcpHostAdapter::connect(peer, addr).await.unwrap();
        let _server = server.await.unwrap();

        let other = PeerId::from("someone-else");
        assert!(client.send_on_data_channel(&other, b"nope").await.is_err());
    }
}
