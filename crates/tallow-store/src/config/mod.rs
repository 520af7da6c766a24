//! Client configuration

pub mod defaults;
pub mod loader;
pub mod schema;

pub use loader::{config_path, load_config, save_config};
pub use schema::{ConnectionConfig, TallowConfig, TransferConfig, UiConfig};
