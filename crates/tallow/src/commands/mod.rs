//! Command implementations

pub mod chat;
pub mod completions;
pub mod config_cmd;
pub mod doctor;
pub mod receive;
pub mod send;
pub mod trust;
pub mod version;
