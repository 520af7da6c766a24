//! Transfer state machines
//!
//! Sender and receiver each drive the same underlying `TransferState` set
//! through slightly different legal transitions (`Streaming` vs
//! `Receiving`). Both are validated by one transition table so a future
//! wire-triggered transition can't silently skip a state.

use crate::{ProtocolError, Result};

/// Which side of a transfer this state machine belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// We initiated the `file-request`.
    Send,
    /// We received the `file-request`.
    Recv,
}

/// Why a transfer was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The user (sender or receiver) cancelled explicitly.
    User,
    /// The remote peer disconnected from the room.
    PeerLeft,
    /// An unrecoverable transport or integrity error occurred.
    Error,
}

impl CancelReason {
    /// Decode the one-byte wire representation from a `cancel` frame payload.
    pub fn from_wire(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::User),
            1 => Some(Self::PeerLeft),
            2 => Some(Self::Error),
            _ => None,
        }
    }

    /// Encode to the one-byte wire representation.
    pub fn to_wire(self) -> u8 {
        match self {
            Self::User => 0,
            Self::PeerLeft => 1,
            Self::Error => 2,
        }
    }
}

/// A transfer's lifecycle state.
///
/// The sender path is `Init -> Requested -> Accepted -> Streaming ->
/// {Done | Cancelled | Failed}`, with a `Requested -> Declined -> Failed`
/// branch. The receiver path mirrors it with `Receiving` instead of
/// `Streaming`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    /// Constructed, nothing sent yet.
    Init,
    /// `file-request` sent (sender) or received (receiver), awaiting response.
    Requested,
    /// `file-response{accepted:true}` received/sent; chunks can now flow.
    Accepted,
    /// Sender is actively streaming chunks.
    Streaming,
    /// Receiver is actively accumulating chunks.
    Receiving,
    /// Receiver declined (`file-response{accepted:false}`).
    Declined,
    /// Completed: `file-end` sent/verified successfully.
    Done,
    /// Cancelled by either side before completion.
    Cancelled(CancelReason),
    /// Terminal failure: timeout, transport closed, or corrupt digest.
    Failed,
}

/// Drives one transfer's state through its legal transitions.
#[derive(Debug)]
pub struct TransferStateMachine {
    direction: Direction,
    state: TransferState,
}

impl TransferStateMachine {
    /// Create a new state machine in `Init` for the given direction.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            state: TransferState::Init,
        }
    }

    /// The current state.
    pub fn state(&self) -> TransferState {
        self.state
    }

    /// The direction (send/recv) this machine was created for.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Attempt a transition, validating it against the direction-specific table.
    pub fn transition(&mut self, new_state: TransferState) -> Result<()> {
        if !self.is_valid(new_state) {
            return Err(ProtocolError::InvalidStateTransition {
                from: format!("{:?}", self.state),
                to: format!("{:?}", new_state),
            });
        }
        self.state = new_state;
        Ok(())
    }

    fn is_valid(&self, new_state: TransferState) -> bool {
        use TransferState::*;
        // A cancel can land from any non-terminal state, from either side.
        if matches!(new_state, Cancelled(_))
            && !matches!(self.state, Done | Failed | Cancelled(_) | Declined)
        {
            return true;
        }
        // Any non-terminal state can fail out (timeout, transport closed, corrupt digest).
        if matches!(new_state, Failed) && !matches!(self.state, Done | Cancelled(_)) {
            return true;
        }

        match self.direction {
            Direction::Send => matches!(
                (self.state, new_state),
                (Init, Requested)
                    | (Requested, Accepted)
                    | (Requested, Declined)
                    | (Declined, Failed)
                    | (Accepted, Streaming)
                    | (Streaming, Done)
            ),
            Direction::Recv => matches!(
                (self.state, new_state),
                (Init, Requested)
                    | (Requested, Accepted)
                    | (Requested, Declined)
                    | (Declined, Failed)
                    | (Accepted, Receiving)
                    | (Receiving, Done)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_happy_path() {
        let mut sm = TransferStateMachine::new(Direction::Send);
        sm.transition(TransferState::Requested).unwrap();
        sm.transition(TransferState::Accepted).unwrap();
        sm.transition(TransferState::Streaming).unwrap();
        sm.transition(TransferState::Done).unwrap();
        assert_eq!(sm.state(), TransferState::Done);
    }

    #[test]
    fn receiver_happy_path() {
        let mut sm = TransferStateMachine::new(Direction::Recv);
        sm.transition(TransferState::Requested).unwrap();
        sm.transition(TransferState::Accepted).unwrap();
        sm.transition(TransferState::Receiving).unwrap();
        sm.transition(TransferState::Done).unwrap();
        assert_eq!(sm.state(), TransferState::Done);
    }

    #[test]
    fn decline_then_fail() {
        let mut sm = TransferStateMachine::new(Direction::Recv);
        sm.transition(TransferState::Requested).unwrap();
        sm.transition(TransferState::Declined).unwrap();
        sm.transition(TransferState::Failed).unwrap();
    }

    #[test]
    fn sender_cannot_receive() {
        let mut sm = TransferStateMachine::new(Direction::Send);
        sm.transition(TransferState::Requested).unwrap();
        sm.transition(TransferState::Accepted).unwrap();
        assert!(sm.transition(TransferState::Receiving).is_err());
    }

    #[test]
    fn cancel_from_streaming() {
        let mut sm = TransferStateMachine::new(Direction::Send);
        sm.transition(TransferState::Requested).unwrap();
        sm.transition(TransferState::Accepted).unwrap();
        sm.transition(TransferState::Streaming).unwrap();
        sm.transition(TransferState::Cancelled(CancelReason::User))
            .unwrap();
        assert_eq!(sm.state(), TransferState::Cancelled(CancelReason::User));
    }

    #[test]
    fn cancel_is_terminal_no_further_transitions() {
        let mut sm = TransferStateMachine::new(Direction::Send);
        sm.transition(TransferState::Requested).unwrap();
        sm.transition(TransferState::Cancelled(CancelReason::User))
            .unwrap();
        assert!(sm.transition(TransferState::Accepted).is_err());
        assert!(sm
            .transition(TransferState::Cancelled(CancelReason::Error))
            .is_err());
    }

    #[test]
    fn done_is_terminal() {
        let mut sm = TransferStateMachine::new(Direction::Send);
        sm.transition(TransferState::Requested).unwrap();
        sm.transition(TransferState::Accepted).unwrap();
        sm.transition(TransferState::Streaming).unwrap();
        sm.transition(TransferState::Done).unwrap();
        assert!(sm.transition(TransferState::Failed).is_err());
    }

    #[test]
    fn cancel_reason_wire_roundtrip() {
        for r in [CancelReason::User, CancelReason::PeerLeft, CancelReason::Error] {
            assert_eq!(CancelReason::from_wire(r.to_wire()), Some(r));
        }
        assert_eq!(CancelReason::from_wire(99), None);
    }
}
