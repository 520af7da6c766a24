//! Relay-mode data forwarding over signaling

pub mod channel;

pub use channel::RelayChannel;
