//! Browser `HostAdapter`: drives a real `RtcPeerConnection`/`RtcDataChannel`
//!
//! Implements `tallow_net::pcm::HostAdapter` (the `wasm32` variant, with no
//! `Send` bound — see that trait's doc comment) so PCM's negotiation and
//! connection-tracking state machines can run unmodified against a real
//! browser WebRTC stack. One [`WebHostAdapter`] owns one `RtcPeerConnection`
//! per peer; `ondatachannel`/`onmessage` callbacks buffer inbound frames so
//! `poll_data_channel` can stay non-blocking, the same contract the trait's
//! TCP-socket stand-in upholds on the CLI side.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use js_sys::Reflect;
use tallow_net::pcm::HostAdapter;
use tallow_protocol::ids::PeerId;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    MessageEvent, RtcConfiguration, RtcDataChannel, RtcDataChannelEvent, RtcIceCandidateInit, RtcPeerConnection,
    RtcSdpType, RtcSessionDescriptionInit,
};

/// Error surfaced by [`WebHostAdapter`]: every WebRTC API call here returns
/// a JS exception (`JsValue`) or a rejected `Promise`, neither of which is
/// `Send` — converted to a plain message as soon as it's caught so the
/// adapter's `Error` type can stay simple and `'static`.
#[derive(Debug)]
pub struct WebAdapterError(pub String);

impl fmt::Display for WebAdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for WebAdapterError {}

impl From<JsValue> for WebAdapterError {
    fn from(v: JsValue) -> Self {
        Self(js_error_string(&v))
    }
}

fn js_error_string(v: &JsValue) -> String {
    v.as_string()
        .or_else(|| Reflect::get(v, &JsValue::from_str("message")).ok().and_then(|m| m.as_string()))
        .unwrap_or_else(|| format!("{v:?}"))
}

struct PeerConn {
    pc: RtcPeerConnection,
    channel: Rc<RefCell<Option<RtcDataChannel>>>,
    inbox: Rc<RefCell<VecDeque<Vec<u8>>>>,
    /// Whether we called `create_offer` for this peer (so an incoming
    /// remote description is an answer) rather than `create_answer`
    /// (so it's the initial offer). The trait's `set_remote_description`
    /// takes a bare SDP string with no type tag, so this is how the
    /// adapter recovers which one it is.
    sent_offer: bool,
    // Event-listener closures must outlive the objects they're registered
    // on; dropping the `PeerConn` drops these together with the `pc`.
    _on_data_channel: Option<Closure<dyn FnMut(RtcDataChannelEvent)>>,
    _on_message: Option<Closure<dyn FnMut(MessageEvent)>>,
}

/// Browser-side `HostAdapter`, one `RtcPeerConnection` per peer.
pub struct WebHostAdapter {
    ice_servers: Vec<String>,
    peers: HashMap<PeerId, PeerConn>,
}

impl WebHostAdapter {
    /// Create an adapter that configures each new `RtcPeerConnection` with
    /// `ice_servers` (STUN/TURN URLs, e.g. `"stun:stun.l.google.com:19302"`).
    pub fn new(ice_servers: Vec<String>) -> Self {
        Self {
            ice_servers,
            peers: HashMap::new(),
        }
    }

    fn new_peer_connection(&self) -> Result<RtcPeerConnection, WebAdapterError> {
        let config = RtcConfiguration::new();
        let ice_servers = js_sys::Array::new();
        for url in &self.ice_servers {
            let entry = js_sys::Object::new();
            Reflect::set(&entry, &JsValue::from_str("urls"), &JsValue::from_str(url))?;
            ice_servers.push(&entry);
        }
        config.set_ice_servers(&ice_servers);
        RtcPeerConnection::new_with_configuration(&config).map_err(WebAdapterError::from)
    }

    fn wire_inbox(channel: &RtcDataChannel, inbox: &Rc<RefCell<VecDeque<Vec<u8>>>>) -> Closure<dyn FnMut(MessageEvent)> {
        let inbox = inbox.clone();
        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            if let Ok(buf) = event.data().dyn_into::<js_sys::ArrayBuffer>() {
                let bytes = js_sys::Uint8Array::new(&buf).to_vec();
                inbox.borrow_mut().push_back(bytes);
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        channel.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        on_message
    }

    /// Get or create the [`PeerConn`] for `peer`. Registers `ondatachannel`
    /// so an answerer picks up the channel the offerer created.
    fn peer_entry(&mut self, peer: &PeerId) -> Result<&mut PeerConn, WebAdapterError> {
        if !self.peers.contains_key(peer) {
            let pc = self.new_peer_connection()?;
            let channel: Rc<RefCell<Option<RtcDataChannel>>> = Rc::new(RefCell::new(None));
            let inbox: Rc<RefCell<VecDeque<Vec<u8>>>> = Rc::new(RefCell::new(VecDeque::new()));

            let channel_for_closure = channel.clone();
            let inbox_for_closure = inbox.clone();
            let on_data_channel = Closure::wrap(Box::new(move |event: RtcDataChannelEvent| {
                let incoming = event.channel();
                // The channel itself outlives this callback's stack frame
                // and there's no owner left to park the listener closure
                // in, so `forget` it rather than drop it (and its
                // `onmessage` registration) immediately.
                WebHostAdapter::wire_inbox(&incoming, &inbox_for_closure).forget();
                *channel_for_closure.borrow_mut() = Some(incoming);
            }) as Box<dyn FnMut(RtcDataChannelEvent)>);
            pc.set_ondatachannel(Some(on_data_channel.as_ref().unchecked_ref()));

            self.peers.insert(
                peer.clone(),
                PeerConn {
                    pc,
                    channel,
                    inbox,
                    sent_offer: false,
                    _on_data_channel: Some(on_data_channel),
                    _on_message: None,
                },
            );
        }
        Ok(self.peers.get_mut(peer).expect("just inserted"))
    }
}

impl HostAdapter for WebHostAdapter {
    type Error = WebAdapterError;

    async fn create_offer(&mut self, peer: &PeerId) -> Result<String, Self::Error> {
        let entry = self.peer_entry(peer)?;
        let channel = entry.pc.create_data_channel("tallow");
        let on_message = Self::wire_inbox(&channel, &entry.inbox);
        *entry.channel.borrow_mut() = Some(channel);
        entry._on_message = Some(on_message);
        entry.sent_offer = true;

        let offer = JsFuture::from(entry.pc.create_offer()).await?;
        let sdp = Reflect::get(&offer, &JsValue::from_str("sdp"))?
            .as_string()
            .ok_or_else(|| WebAdapterError("createOffer() result had no sdp field".to_string()))?;

        let desc = RtcSessionDescriptionInit::new(RtcSdpType::Offer);
        desc.set_sdp(&sdp);
        JsFuture::from(entry.pc.set_local_description(&desc)).await?;

        Ok(sdp)
    }

    async fn create_answer(&mut self, peer: &PeerId, offer_sdp: &str) -> Result<String, Self::Error> {
        let entry = self.peer_entry(peer)?;

        let remote = RtcSessionDescriptionInit::new(RtcSdpType::Offer);
        remote.set_sdp(offer_sdp);
        JsFuture::from(entry.pc.set_remote_description(&remote)).await?;

        let answer = JsFuture::from(entry.pc.create_answer()).await?;
        let sdp = Reflect::get(&answer, &JsValue::from_str("sdp"))?
            .as_string()
            .ok_or_else(|| WebAdapterError("createAnswer() result had no sdp field".to_string()))?;

        let desc = RtcSessionDescriptionInit::new(RtcSdpType::Answer);
        desc.set_sdp(&sdp);
        JsFuture::from(entry.pc.set_local_description(&desc)).await?;

        Ok(sdp)
    }

    async fn set_remote_description(&mut self, peer: &PeerId, sdp: &str) -> Result<(), Self::Error> {
        let entry = self.peer_entry(peer)?;
        let kind = if entry.sent_offer { RtcSdpType::Answer } else { RtcSdpType::Offer };
        let desc = RtcSessionDescriptionInit::new(kind);
        desc.set_sdp(sdp);
        JsFuture::from(entry.pc.set_remote_description(&desc)).await?;
        Ok(())
    }

    async fn add_ice_candidate(&mut self, peer: &PeerId, candidate: &str) -> Result<(), Self::Error> {
        let entry = self.peer_entry(peer)?;
        let init = RtcIceCandidateInit::new(candidate);
        JsFuture::from(entry.pc.add_ice_candidate_with_opt_rtc_ice_candidate_init(Some(&init))).await?;
        Ok(())
    }

    async fn send_on_data_channel(&mut self, peer: &PeerId, frame: &[u8]) -> Result<(), Self::Error> {
        let entry = self.peer_entry(peer)?;
        let channel = entry
            .channel
            .borrow()
            .clone()
            .ok_or_else(|| WebAdapterError("no open data channel for peer".to_string()))?;
        channel.send_with_u8_array(frame).map_err(WebAdapterError::from)
    }

    async fn poll_data_channel(&mut self, peer: &PeerId) -> Result<Option<Vec<u8>>, Self::Error> {
        let entry = self.peer_entry(peer)?;
        Ok(entry.inbox.borrow_mut().pop_front())
    }
}
