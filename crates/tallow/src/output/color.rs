//! Colored terminal output
//!
//! Respects `NO_COLOR`/non-tty the same way `owo-colors`'s `Stream::Stdout`
//! auto-detection does; callers never need to check themselves.

use owo_colors::{OwoColorize, Stream};

/// Semantic styles used across the CLI's status lines.
#[derive(Debug, Clone, Copy)]
pub enum Style {
    Success,
    Error,
    Warning,
    Info,
    Dim,
}

/// Apply `style` to `text` for display, respecting color auto-detection.
pub fn styled(text: &str, style: Style) -> String {
    match style {
        Style::Success => text.if_supports_color(Stream::Stdout, |t| t.green()).to_string(),
        Style::Error => text.if_supports_color(Stream::Stdout, |t| t.red()).to_string(),
        Style::Warning => text.if_supports_color(Stream::Stdout, |t| t.yellow()).to_string(),
        Style::Info => text.if_supports_color(Stream::Stdout, |t| t.cyan()).to_string(),
        Style::Dim => text.if_supports_color(Stream::Stdout, |t| t.dimmed()).to_string(),
    }
}

/// Print a warning line to stderr.
pub fn warning(message: &str) {
    eprintln!("{} {}", styled("warning:", Style::Warning), message);
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    eprintln!("{} {}", styled("error:", Style::Error), message);
}

/// Print a success line to stdout.
pub fn success(message: &str) {
    println!("{} {}", styled("ok:", Style::Success), message);
}

/// Print an informational line to stdout.
pub fn info(message: &str) {
    println!("{} {}", styled("info:", Style::Info), message);
}

/// Render a room code for display, highlighted so it's easy to read back.
pub fn room_code(code: &str) -> String {
    code.if_supports_color(Stream::Stdout, |t| t.style(owo_colors::Style::new().bold().cyan()))
        .to_string()
}
