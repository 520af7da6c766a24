//! WebSocket signaling with the room server

pub mod client;

pub use client::SignalingClient;
