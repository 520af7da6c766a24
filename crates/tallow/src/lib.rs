//! Headless reference client for Tallow rooms
//!
//! Exposed as a library, not just a binary, so integration tests can drive
//! [`harness::TcpHostAdapter`] and the room/transport plumbing directly
//! instead of shelling out to the compiled binary for every case.

#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod exit_codes;
pub mod harness;
pub mod logging;
pub mod output;
pub mod session;
pub mod transport;
pub mod trust_store;
