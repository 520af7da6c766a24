//! `tallow config` — inspect and edit the on-disk client configuration

use anyhow::{bail, Context};
use tallow_store::config::{load_config, save_config, config_path, TallowConfig};

use crate::cli::{ConfigArgs, ConfigCommands};
use crate::output;

pub async fn execute(args: ConfigArgs, json: bool) -> anyhow::Result<()> {
    match args.command {
        ConfigCommands::Show => show(json),
        ConfigCommands::Path => {
            println!("{}", config_path().display());
            Ok(())
        }
        ConfigCommands::Set { key, value } => set(&key, &value, json),
        ConfigCommands::Reset { yes } => reset(yes, json),
    }
}

fn show(json: bool) -> anyhow::Result<()> {
    let config = load_config().context("loading configuration")?;
    if json {
        println!("{}", serde_json::to_string(&config)?);
    } else {
        println!("{}", toml::to_string_pretty(&config)?);
    }
    Ok(())
}

fn reset(yes: bool, json: bool) -> anyhow::Result<()> {
    if !yes && !crate::output::prompts::confirm("Reset configuration to defaults?")? {
        output::color::info("left unchanged");
        return Ok(());
    }
    save_config(&TallowConfig::default()).context("writing default configuration")?;
    if json {
        println!("{}", serde_json::json!({ "reset": true }));
    } else {
        output::color::success("configuration reset to defaults");
    }
    Ok(())
}

/// Apply a dotted `section.field` key to a parsed string value.
fn set(key: &str, value: &str, json: bool) -> anyhow::Result<()> {
    let mut config = load_config().context("loading configuration")?;

    match key {
        "connection.signaling-url" | "connection.signaling_url" => {
            config.connection.signaling_url = value.to_string();
        }
        "connection.slow-threshold-secs" => {
            config.connection.slow_threshold_secs = value.parse().context("expected an integer number of seconds")?;
        }
        "connection.relay-fallback-threshold-secs" => {
            config.connection.relay_fallback_threshold_secs =
                value.parse().context("expected an integer number of seconds")?;
        }
        "connection.idle-timeout-secs" => {
            config.connection.idle_timeout_secs = value.parse().context("expected an integer number of seconds")?;
        }
        "transfer.download-dir" => {
            config.transfer.download_dir = value.into();
        }
        "transfer.auto-accept-trusted" => {
            config.transfer.auto_accept_trusted = value.parse().context("expected true or false")?;
        }
        "ui.theme" => {
            config.ui.theme = value.to_string();
        }
        "ui.show-notifications" => {
            config.ui.show_notifications = value.parse().context("expected true or false")?;
        }
        "ui.language" => {
            config.ui.language = value.to_string();
        }
        other => bail!("unknown configuration key '{other}'"),
    }

    save_config(&config).context("writing configuration")?;
    if json {
        println!("{}", serde_json::json!({ "key": key, "value": value }));
    } else {
        output::color::success(&format!("set {key} = {value}"));
    }
    Ok(())
}
