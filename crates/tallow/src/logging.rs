//! `tracing-subscriber` setup for the CLI binary
//!
//! `RUST_LOG` always wins when set; otherwise the `-v`/`-q` flags pick a
//! default level, matching the room server's own `init_logging`.

use tracing_subscriber::EnvFilter;

/// Initialize the global `tracing` subscriber.
///
/// `verbosity` is the number of `-v` flags (0 = warn, 1 = info, 2 = debug,
/// 3+ = trace); `quiet` forces error-only regardless of `verbosity`.
/// `json` switches the formatter to structured JSON lines.
pub fn init_logging(verbosity: u8, quiet: bool, json: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
