//! WebSocket signaling over the browser's native `WebSocket` binding
//!
//! Speaks the same `RelayEnvelope` JSON text-frame protocol as
//! `tallow_net::signaling::client::SignalingClient`, but can't use that
//! client directly: `tokio-tungstenite` dials a real TCP socket, which
//! doesn't exist inside a browser sandbox. The browser's own `WebSocket`
//! object is callback-driven rather than `async`, so incoming envelopes are
//! buffered by the `onmessage` closure and drained with a non-blocking
//! [`WebSignaling::poll_envelope`] — the same shape `pcm::HostAdapter`'s
//! `poll_data_channel` already uses for the data channel side.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tallow_protocol::wire::messages::RelayEnvelope;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{MessageEvent, WebSocket};

/// A room-server connection driven by the browser's `WebSocket` API.
///
/// Construct with [`WebSignaling::connect`], `send_envelope` outgoing
/// control messages, and drain incoming ones with `poll_envelope`.
#[wasm_bindgen]
pub struct WebSignaling {
    socket: WebSocket,
    inbox: Rc<RefCell<VecDeque<RelayEnvelope>>>,
    // Closures must outlive the `WebSocket`'s event listeners they're
    // registered on; dropping `WebSignaling` drops them together.
    _on_message: Closure<dyn FnMut(MessageEvent)>,
}

#[wasm_bindgen]
impl WebSignaling {
    /// Open a `WebSocket` to `url` (e.g. `wss://relay.example.com/ws/AB12`).
    ///
    /// Returns once the socket object exists, not once the connection is
    /// established — callers should wait for [`WebSignaling::is_open`] or
    /// the first successful `poll_envelope`/`send_envelope` before relying
    /// on the connection.
    #[wasm_bindgen(constructor)]
    pub fn connect(url: &str) -> Result<WebSignaling, JsValue> {
        let socket = WebSocket::new(url)?;
        socket.set_binary_type(web_sys::BinaryType::Arraybuffer);

        let inbox: Rc<RefCell<VecDeque<RelayEnvelope>>> = Rc::new(RefCell::new(VecDeque::new()));
        let inbox_for_closure = inbox.clone();

        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            if let Some(text) = event.data().as_string() {
                if let Ok(envelope) = serde_json::from_str::<RelayEnvelope>(&text) {
                    inbox_for_closure.borrow_mut().push_back(envelope);
                }
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        Ok(WebSignaling {
            socket,
            inbox,
            _on_message: on_message,
        })
    }

    /// Whether the underlying `WebSocket` is in the `OPEN` state.
    #[wasm_bindgen(js_name = "isOpen")]
    pub fn is_open(&self) -> bool {
        self.socket.ready_state() == WebSocket::OPEN
    }

    /// Send one envelope as a JSON text frame.
    #[wasm_bindgen(js_name = "sendEnvelope")]
    pub fn send_envelope(&self, envelope: JsValue) -> Result<(), JsValue> {
        let envelope: RelayEnvelope = serde_wasm_bindgen::from_value(envelope)
            .map_err(|e| JsValue::from_str(&format!("deserialize envelope: {}", e)))?;
        let json = serde_json::to_string(&envelope)
            .map_err(|e| JsValue::from_str(&format!("serialize envelope: {}", e)))?;
        self.socket.send_with_str(&json)
    }

    /// Pop the oldest buffered envelope, if one has arrived.
    ///
    /// Returns `null` rather than blocking — JS drives this from its own
    /// event loop (a poll interval, or right before each `await` point).
    #[wasm_bindgen(js_name = "pollEnvelope")]
    pub fn poll_envelope(&self) -> Result<JsValue, JsValue> {
        match self.inbox.borrow_mut().pop_front() {
            Some(envelope) => serde_wasm_bindgen::to_value(&envelope)
                .map_err(|e| JsValue::from_str(&format!("serialize envelope: {}", e))),
            None => Ok(JsValue::NULL),
        }
    }

    /// Close the connection.
    pub fn close(&self) -> Result<(), JsValue> {
        self.socket.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Confirms the JSON shape `onmessage` parses matches what
    /// `tallow_net::signaling::client::SignalingClient` sends — both sides
    /// of the room-server socket must agree on `RelayEnvelope`'s wire form.
    #[test]
    fn relay_envelope_round_trips_through_json_text() {
        let envelope = RelayEnvelope {
            kind: "peer-joined".to_string(),
            from: None,
            to: None,
            data: Some(serde_json::json!({"id": "p1"})),
        };
        let text = serde_json::to_string(&envelope).unwrap();
        let back: RelayEnvelope = serde_json::from_str(&text).unwrap();
        assert_eq!(back.kind, "peer-joined");
    }
}
