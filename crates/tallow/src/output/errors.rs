//! Smart error diagnosis with actionable guidance

/// Provide context-aware guidance for common error patterns.
///
/// Returns `Some(hint)` if the error message matches a known pattern,
/// providing the user with actionable steps to resolve the issue.
pub fn diagnose(err: &dyn std::fmt::Display) -> Option<String> {
    let msg = err.to_string();
    let lower = msg.to_lowercase();

    if lower.contains("connection refused") {
        return Some(
            "The signaling server may be down or unreachable. Try:\n  \
             1. Check your internet connection\n  \
             2. Try a different server: tallow send --signaling-url <url> <file>\n  \
             3. Run 'tallow doctor' to diagnose"
                .to_string(),
        );
    }
    if lower.contains("address already in use") {
        return Some(
            "Another instance of tallow or tallow-relay may be running.\n  \
             Check with: lsof -i :4433 (Unix) or netstat -an | findstr 4433 (Windows)"
                .to_string(),
        );
    }
    if lower.contains("permission denied") {
        return Some(
            "Permission denied. Try:\n  \
             1. Check file/directory permissions\n  \
             2. Specify a different output directory: tallow receive -o ~/Downloads -r <room>"
                .to_string(),
        );
    }
    if lower.contains("no such file or directory") || lower.contains("not found") {
        return Some(
            "File or directory not found. Verify the path exists and is spelled correctly."
                .to_string(),
        );
    }
    if lower.contains("timed out") || lower.contains("timeout") {
        return Some(
            "Connection timed out. The peer may not have joined the room yet, or the \
             signaling server may be slow.\n  \
             Try again, or check 'tallow doctor' for connectivity issues."
                .to_string(),
        );
    }
    if lower.contains("no space left on device") || lower.contains("disk full") {
        return Some(
            "Disk full. Free up space or specify a different output directory: \
             tallow receive -o /path/with/space -r <room>"
                .to_string(),
        );
    }
    if lower.contains("broken pipe") {
        return Some("The connection was interrupted. The peer may have disconnected.".to_string());
    }
    if lower.contains("authentication") || lower.contains("auth failed") {
        return Some(
            "Authentication failed. Check your room password:\n  \
             1. Set TALLOW_ROOM_PASSWORD environment variable\n  \
             2. Or use --password <password>"
                .to_string(),
        );
    }

    None
}
