//! Perfect negotiation role assignment
//!
//! WebRTC's offer/answer glare problem (both sides sending an offer at once)
//! is resolved by giving each pair of peers a fixed, symmetric role: one
//! side is "polite" and backs off when it sees a collision, the other is
//! "impolite" and wins. The role has to be derivable by both ends without
//! talking to each other first, so it falls out of [`PeerId`]'s total byte
//! order: the lexicographically smaller id is polite.
//!
//! This module only decides the role and tracks whether an offer is
//! currently in flight; the SDP exchange itself happens in the browser and
//! is invisible here.

use tallow_protocol::ids::PeerId;

/// A peer's role in one negotiation pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Backs off and accepts a rollback if an incoming offer collides with
    /// one already sent.
    Polite,
    /// Ignores a colliding incoming offer and keeps its own outgoing offer.
    Impolite,
}

/// Decide this local peer's role against `remote`.
///
/// The smaller id (by byte order) is polite. Ids are never equal in
/// practice (the room server assigns them), but if they were, the local
/// side deterministically takes the impolite role rather than panicking.
pub fn role_for(local: &PeerId, remote: &PeerId) -> Role {
    if local < remote {
        Role::Polite
    } else {
        Role::Impolite
    }
}

/// Tracks whether a local offer is outstanding and whether an `ignore-offer`
/// condition is currently active, per the perfect-negotiation pattern.
#[derive(Debug, Clone)]
pub struct Negotiation {
    role: Role,
    making_offer: bool,
    ignore_offer: bool,
}

impl Negotiation {
    /// Start a negotiation session for `local` against `remote`.
    pub fn new(local: &PeerId, remote: &PeerId) -> Self {
        Self {
            role: role_for(local, remote),
            making_offer: false,
            ignore_offer: false,
        }
    }

    /// This side's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Call before sending a local offer.
    pub fn begin_offer(&mut self) {
        self.making_offer = true;
    }

    /// Call once the local offer has been sent.
    pub fn offer_sent(&mut self) {
        self.making_offer = false;
    }

    /// Decide what to do with an incoming offer, given whether the local
    /// signaling state is currently stable (no local offer pending at the
    /// SDP layer beyond `making_offer`'s own bookkeeping).
    ///
    /// Returns `true` if the incoming offer should be ignored (impolite side
    /// during a collision), `false` if it should be processed (and, for the
    /// polite side during a collision, rolled back to first).
    pub fn should_ignore_offer(&mut self, signaling_stable: bool) -> bool {
        let collision = self.making_offer || !signaling_stable;
        let ignore = self.role == Role::Impolite && collision;
        self.ignore_offer = ignore;
        ignore
    }

    /// Whether the most recent incoming offer was ignored, and so its
    /// matching answer should be ignored too.
    pub fn is_ignoring(&self) -> bool {
        self.ignore_offer
    }
}
