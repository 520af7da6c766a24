//! CLI argument parsing

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tallow")]
#[command(author, version, about = "Headless reference client for Tallow rooms", long_about = None)]
pub struct Cli {
    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send files to a room
    Send(SendArgs),

    /// Receive files from a room
    Receive(ReceiveArgs),

    /// Join a room for interactive text chat
    Chat(ChatArgs),

    /// Manage trusted peer fingerprints
    Trust(TrustArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Run diagnostic checks against the configured relay
    Doctor,

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Show version and build info
    Version,
}

/// Shared relay/room connection flags used by every room-joining command.
#[derive(Args, Clone)]
pub struct RoomArgs {
    /// Room code to join. Generated and printed if omitted (send only).
    #[arg(short, long, env = "TALLOW_ROOM")]
    pub room: Option<String>,

    /// Room password, if the room requires one.
    #[arg(long, env = "TALLOW_ROOM_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Signaling server URL, overriding the configured default.
    #[arg(long)]
    pub signaling_url: Option<String>,

    /// Display name advertised to other peers in the room.
    #[arg(long)]
    pub name: Option<String>,

    /// Print the post-key-exchange verification string for MITM detection.
    #[arg(long)]
    pub verify: bool,
}

#[derive(Args)]
pub struct SendArgs {
    /// Files to send
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub room: RoomArgs,

    /// Target peer ID within the room. Required if more than one other peer is present.
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Args)]
pub struct ReceiveArgs {
    #[command(flatten)]
    pub room: RoomArgs,

    /// Output directory for received files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Accept incoming transfers without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ChatArgs {
    #[command(flatten)]
    pub room: RoomArgs,
}

#[derive(Args)]
pub struct TrustArgs {
    #[command(subcommand)]
    pub command: TrustCommands,
}

#[derive(Subcommand)]
pub enum TrustCommands {
    /// List known peer fingerprints and their trust level
    List,
    /// Raise a peer's trust level (seen -> trusted -> verified)
    Raise {
        /// Fingerprint hex, or a prefix of it
        fingerprint: String,
        /// Target level: trusted or verified
        level: String,
    },
    /// Forget a peer's fingerprint entirely
    Forget {
        /// Fingerprint hex, or a prefix of it
        fingerprint: String,
    },
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Print the path to the configuration file
    Path,
    /// Set a configuration value (e.g. `connection.signaling-url wss://...`)
    Set {
        /// Dotted config key
        key: String,
        /// New value
        value: String,
    },
    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
