//! `tallow trust` — inspect and edit the local trusted-device store

use anyhow::{bail, Context};
use tallow_store::trust::{Fingerprint, TrustLevel};

use crate::cli::{TrustArgs, TrustCommands};
use crate::{output, trust_store};

pub async fn execute(args: TrustArgs, json: bool) -> anyhow::Result<()> {
    match args.command {
        TrustCommands::List => list(json),
        TrustCommands::Raise { fingerprint, level } => raise(&fingerprint, &level, json),
        TrustCommands::Forget { fingerprint } => forget(&fingerprint, json),
    }
}

fn list(json: bool) -> anyhow::Result<()> {
    let store = trust_store::load().context("loading trust store")?;
    let mut records: Vec<_> = store.iter().collect();
    records.sort_by(|a, b| a.1.name.cmp(&b.1.name));

    if json {
        let entries: Vec<_> = records
            .iter()
            .map(|(fp, r)| {
                serde_json::json!({
                    "fingerprint": fp.hex(),
                    "name": r.name,
                    "device_type": r.device_type,
                    "level": r.level,
                    "trusted_at": r.trusted_at,
                })
            })
            .collect();
        println!("{}", serde_json::json!({ "peers": entries }));
        return Ok(());
    }

    if records.is_empty() {
        output::color::info("no trusted devices on file yet");
        return Ok(());
    }
    for (fp, record) in records {
        println!(
            "{}  {}  {:?}  {}  ({})",
            fp.hex(),
            fp.emoji(),
            record.level,
            record.name,
            record.trusted_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

fn raise(fingerprint: &str, level: &str, json: bool) -> anyhow::Result<()> {
    let target = match level.to_lowercase().as_str() {
        "trusted" => TrustLevel::Trusted,
        "verified" => TrustLevel::Verified,
        "seen" => TrustLevel::Seen,
        other => bail!("unknown trust level '{other}', expected seen, trusted, or verified"),
    };

    let mut store = trust_store::load().context("loading trust store")?;
    let fp = resolve_fingerprint(&store, fingerprint)?;
    store.set_level(fp, target);
    trust_store::save(&store).context("saving trust store")?;

    if json {
        println!("{}", serde_json::json!({ "fingerprint": fp.hex(), "level": level }));
    } else {
        output::color::success(&format!("{} is now {:?}", fp.hex(), target));
    }
    Ok(())
}

fn forget(fingerprint: &str, json: bool) -> anyhow::Result<()> {
    let mut store = trust_store::load().context("loading trust store")?;
    let fp = resolve_fingerprint(&store, fingerprint)?;
    store.forget(fp);
    trust_store::save(&store).context("saving trust store")?;

    if json {
        println!("{}", serde_json::json!({ "forgotten": fp.hex() }));
    } else {
        output::color::success(&format!("forgot {}", fp.hex()));
    }
    Ok(())
}

/// Resolve a hex string or unambiguous prefix of it to a known fingerprint.
fn resolve_fingerprint(store: &tallow_store::trust::TrustStore, input: &str) -> anyhow::Result<Fingerprint> {
    let needle = input.replace(':', "").to_lowercase();
    let mut matches: Vec<Fingerprint> = store
        .iter()
        .map(|(fp, _)| fp)
        .filter(|fp| fp.hex().replace(':', "").starts_with(&needle))
        .collect();

    match matches.len() {
        0 => bail!("no trusted device matches '{input}'"),
        1 => Ok(matches.remove(0)),
        _ => bail!("'{input}' matches more than one device, use a longer prefix"),
    }
}
