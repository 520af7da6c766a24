//! Output formatting utilities

pub mod color;
pub mod errors;
pub mod progress;
pub mod prompts;
pub mod verify;

pub use progress::TransferProgressBar;

/// Format a byte count as a human-readable string (e.g., "1.43 MiB").
///
/// Uses binary prefixes (KiB, MiB, GiB, TiB) per IEC 80000-13.
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    const GIB: u64 = 1024 * 1024 * 1024;
    const TIB: u64 = 1024 * 1024 * 1024 * 1024;

    if bytes >= TIB {
        format!("{:.2} TiB", bytes as f64 / TIB as f64)
    } else if bytes >= GIB {
        format!("{:.2} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.2} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.2} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a duration for human-readable display.
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

/// Format transfer speed as human-readable bytes/second.
pub fn format_speed(bytes: u64, duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs <= 0.0 {
        return "-- B/s".to_string();
    }
    let bps = bytes as f64 / secs;
    format!("{}/s", format_size(bps as u64))
}
