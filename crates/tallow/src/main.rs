//! Tallow CLI — headless reference client for Tallow rooms

#![forbid(unsafe_code)]

use clap::Parser;
use tallow::{cli, cli::Cli, commands, exit_codes, output};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    tallow::logging::init_logging(cli.verbose, cli.quiet, cli.json);

    if let Err(e) = tallow_store::persistence::paths::ensure_dirs() {
        tracing::warn!("failed to create storage directories: {e}");
    }

    let json_output = cli.json;

    let result = match cli.command {
        cli::Commands::Send(args) => commands::send::execute(args, json_output).await,
        cli::Commands::Receive(args) => commands::receive::execute(args, json_output).await,
        cli::Commands::Chat(args) => commands::chat::execute(args, json_output).await,
        cli::Commands::Trust(args) => commands::trust::execute(args, json_output).await,
        cli::Commands::Config(args) => commands::config_cmd::execute(args, json_output).await,
        cli::Commands::Doctor => commands::doctor::execute(json_output).await,
        cli::Commands::Completions(args) => {
            commands::completions::execute(args);
            Ok(())
        }
        cli::Commands::Version => {
            commands::version::execute(json_output);
            Ok(())
        }
    };

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            if json_output {
                println!("{}", serde_json::json!({ "error": e.to_string() }));
            } else {
                output::color::error(&e.to_string());
                if let Some(hint) = output::errors::diagnose(&e) {
                    eprintln!("{hint}");
                }
            }
            std::process::exit(exit_code_for(&e));
        }
    }
}

/// Map a command failure to a specific exit code where the underlying
/// network error says something more precise than "generic error".
fn exit_code_for(err: &anyhow::Error) -> i32 {
    use tallow_net::error::NetworkError;

    match err.downcast_ref::<NetworkError>() {
        Some(NetworkError::JoinRejected(_)) => exit_codes::AUTH_FAILURE,
        Some(NetworkError::Timeout) => exit_codes::NETWORK_ERROR,
        Some(_) => exit_codes::NETWORK_ERROR,
        None => exit_codes::ERROR,
    }
}
