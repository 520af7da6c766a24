//! `tallow doctor` — diagnose the local install without joining a room

use tallow_store::config::load_config;
use tallow_store::persistence::paths;

use crate::output;

struct Check {
    name: &'static str,
    ok: bool,
    detail: String,
}

pub async fn execute(json: bool) -> anyhow::Result<()> {
    let mut checks = Vec::new();

    match load_config() {
        Ok(config) => checks.push(Check {
            name: "configuration",
            ok: true,
            detail: format!("signaling URL: {}", config.connection.signaling_url),
        }),
        Err(e) => checks.push(Check { name: "configuration", ok: false, detail: e.to_string() }),
    }

    match crate::trust_store::load() {
        Ok(store) => checks.push(Check {
            name: "trust store",
            ok: true,
            detail: format!("{} known device(s)", store.iter().count()),
        }),
        Err(e) => checks.push(Check { name: "trust store", ok: false, detail: e.to_string() }),
    }

    match paths::ensure_dirs() {
        Ok(()) => checks.push(Check {
            name: "storage directories",
            ok: true,
            detail: paths::data_dir().display().to_string(),
        }),
        Err(e) => checks.push(Check { name: "storage directories", ok: false, detail: e.to_string() }),
    }

    if json {
        let entries: Vec<_> = checks
            .iter()
            .map(|c| serde_json::json!({ "check": c.name, "ok": c.ok, "detail": c.detail }))
            .collect();
        println!("{}", serde_json::json!({ "checks": entries }));
    } else {
        println!("Tallow diagnostics");
        println!("==================\n");
        println!("platform: {} / {}", std::env::consts::OS, std::env::consts::ARCH);
        for check in &checks {
            let mark = if check.ok { "ok" } else { "FAIL" };
            println!("[{mark}] {}: {}", check.name, check.detail);
        }
    }

    if checks.iter().any(|c| !c.ok) {
        output::color::warning("one or more checks failed");
    }
    Ok(())
}
