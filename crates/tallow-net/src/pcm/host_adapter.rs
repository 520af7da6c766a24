//! The pure-core/host-adapter seam
//!
//! `negotiation`/`connection`/`relay` never touch a real `RTCPeerConnection`
//! — they operate on opaque SDP/ICE strings and byte frames. Whatever
//! actually owns a data channel (a browser's WebRTC stack, a local TCP
//! socket standing in for one in tests) implements this trait; PCM code is
//! written against it generically and never matches on what's underneath.

use std::future::Future;

use tallow_protocol::ids::PeerId;

/// Bridges PCM's negotiation/transfer logic to a real peer transport.
///
/// `tallow-web` implements this over `web-sys::RtcPeerConnection` in the
/// browser. The `tallow` CLI harness implements it over a locally-dialed
/// TCP duplex stream so negotiation and transfer logic can be exercised by
/// `#[tokio::test]`s without a browser — that stand-in is a real TCP
/// socket, not a fake ICE/DTLS handshake, wrapped in this same interface.
///
/// `web-sys` handle types (`RtcPeerConnection`, `RtcDataChannel`, ...) are
/// `!Send` — they're bound to the single JS thread they were created on —
/// so the `Send` bound PCM otherwise relies on is dropped for `wasm32`
/// rather than making every browser-side future lie about thread safety.
#[cfg(not(target_arch = "wasm32"))]
pub trait HostAdapter: Send {
    /// Error type surfaced by this adapter's underlying transport.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a local SDP offer for `peer`, starting negotiation.
    fn create_offer(&mut self, peer: &PeerId) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Create a local SDP answer for `peer` in response to its offer.
    fn create_answer(
        &mut self,
        peer: &PeerId,
        offer_sdp: &str,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Apply a remote SDP description (offer or answer) from `peer`.
    fn set_remote_description(
        &mut self,
        peer: &PeerId,
        sdp: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Feed a trickled ICE candidate from `peer` into the underlying
    /// transport. A no-op for adapters (like the TCP stand-in) with no
    /// ICE layer of their own.
    fn add_ice_candidate(
        &mut self,
        peer: &PeerId,
        candidate: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Write a data-channel frame to `peer`'s open channel.
    fn send_on_data_channel(
        &mut self,
        peer: &PeerId,
        frame: &[u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Poll for the next data-channel frame from `peer`, if one has
    /// arrived. Returns `Ok(None)` rather than blocking when nothing is
    /// ready.
    fn poll_data_channel(
        &mut self,
        peer: &PeerId,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send;
}

/// `wasm32` mirror of the above, identical except none of the futures (or
/// the trait itself) are required to be `Send` — see the doc comment above.
#[cfg(target_arch = "wasm32")]
pub trait HostAdapter {
    type Error: std::error::Error + 'static;

    fn create_offer(&mut self, peer: &PeerId) -> impl Future<Output = Result<String, Self::Error>>;

    fn create_answer(
        &mut self,
        peer: &PeerId,
        offer_sdp: &str,
    ) -> impl Future<Output = Result<String, Self::Error>>;

    fn set_remote_description(&mut self, peer: &PeerId, sdp: &str) -> impl Future<Output = Result<(), Self::Error>>;

    fn add_ice_candidate(
        &mut self,
        peer: &PeerId,
        candidate: &str,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    fn send_on_data_channel(&mut self, peer: &PeerId, frame: &[u8]) -> impl Future<Output = Result<(), Self::Error>>;

    fn poll_data_channel(&mut self, peer: &PeerId) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::convert::Infallible;

    /// An in-memory adapter used only to confirm the trait shape is
    /// usable from ordinary async code; real exercising of it happens in
    /// the `tallow` CLI harness over a real TCP socket.
    struct LoopbackAdapter {
        inboxes: HashMap<PeerId, VecDeque<Vec<u8>>>,
    }

    impl HostAdapter for LoopbackAdapter {
        type Error = Infallible;

        async fn create_offer(&mut self, _peer: &PeerId) -> Result<String, Infallible> {
            Ok("v=0 offer".to_string())
        }

        async fn create_answer(&mut self, _peer: &PeerId, _offer_sdp: &str) -> Result<String, Infallible> {
            Ok("v=0 answer".to_string())
        }

        async fn set_remote_description(&mut self, _peer: &PeerId, _sdp: &str) -> Result<(), Infallible> {
            Ok(())
        }

        async fn add_ice_candidate(&mut self, _peer: &PeerId, _candidate: &str) -> Result<(), Infallible> {
            Ok(())
        }

        async fn send_on_data_channel(&mut self, peer: &PeerId, frame: &[u8]) -> Result<(), Infallible> {
            self.inboxes.entry(peer.clone()).or_default().push_back(frame.to_vec());
            Ok(())
        }

        async fn poll_data_channel(&mut self, peer: &PeerId) -> Result<Option<Vec<u8>>, Infallible> {
            Ok(self.inboxes.get_mut(peer).and_then(|q| q.pop_front()))
        }
    }

    #[tokio::test]
    async fn loopback_roundtrips_a_frame() {
        let mut adapter = LoopbackAdapter { inboxes: HashMap::new() };
        let peer = PeerId::from("peer-a");

        adapter.send_on_data_channel(&peer, b"hello").await.unwrap();
        let received = adapter.poll_data_channel(&peer).await.unwrap();
        assert_eq!(received, Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn poll_on_empty_inbox_returns_none() {
        let mut adapter = LoopbackAdapter { inboxes: HashMap::new() };
        let peer = PeerId::from("peer-a");
        assert_eq!(adapter.poll_data_channel(&peer).await.unwrap(), None);
    }
}
