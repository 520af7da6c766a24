//! Tallow room server
//!
//! Runs the WebSocket signaling/relay endpoint that pairs browsers into
//! rooms and forwards offer/answer/ICE/relay-data traffic between them.

mod auth;
mod config;
mod rate_limit;
mod room;
mod server;
mod signaling;
mod websocket;

use clap::{Parser, Subcommand};
use config::RelayConfig;
use server::RelayServer;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tallow-relay")]
#[command(about = "Tallow room server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the room server
    Serve {
        /// WebSocket bind address
        #[arg(short, long)]
        addr: Option<String>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { addr, config } => {
            let mut relay_config = match config {
                Some(path) => load_config(&path)?,
                None => RelayConfig::default(),
            };
            if let Some(addr) = addr {
                relay_config.ws_bind_addr = addr;
            }
            relay_config.validate();

            tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting tallow-relay");
            RelayServer::new(relay_config).run().await
        }
    }
}

fn load_config(path: &str) -> std::io::Result<RelayConfig> {
    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
