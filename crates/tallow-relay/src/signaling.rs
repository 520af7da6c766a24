//! Message routing rules
//!
//! The relay classifies every incoming envelope by `type` into one of two
//! routing rules, both defined by [`tallow_protocol::wire::messages`]:
//! forward it to exactly the peer named in `to`, or broadcast it to
//! everyone else in the room. Anything outside both lists is dropped.

use tallow_protocol::wire::messages::{BROADCAST_KINDS, FORWARDABLE_KINDS};

/// How the relay should route one envelope kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Send to the single peer named in the envelope's `to` field.
    Forward,
    /// Send to every other peer in the room.
    Broadcast,
    /// Not a routable kind; drop it.
    Drop,
}

/// Classify an envelope kind for routing.
pub fn classify(kind: &str) -> Route {
    if FORWARDABLE_KINDS.contains(&kind) {
        Route::Forward
    } else if BROADCAST_KINDS.contains(&kind) {
        Route::Broadcast
    } else {
        Route::Drop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offer_is_forwarded() {
        assert_eq!(classify("offer"), Route::Forward);
    }

    #[test]
    fn peer_joined_is_broadcast() {
        assert_eq!(classify("peer-joined"), Route::Broadcast);
    }

    #[test]
    fn unknown_kind_is_dropped() {
        assert_eq!(classify("made-up-kind"), Route::Drop);
    }
}
