//! `tallow version`

pub fn execute(json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "version": env!("CARGO_PKG_VERSION"),
                "target": std::env::consts::ARCH,
                "os": std::env::consts::OS,
            })
        );
    } else {
        println!("tallow {}", env!("CARGO_PKG_VERSION"));
        println!("target: {}-{}", std::env::consts::ARCH, std::env::consts::OS);
    }
}
