use once_cell::sync::Lazy;
use regex::Regex;

/// `host: remainder` as set by most remote shell prompts
static RE_HOST_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^:]+:\s*(.+)$").unwrap());

/// Extract the remote directory from a window title.
///
/// Titles look like `hostname: /path` or `hostname: ~/path`. When a
/// full-screen program is running the remainder is usually its command
/// (`vi`, `htop`), so only path-shaped remainders are accepted. A bare
/// directory name such as `project` is rejected too; showing nothing beats
/// showing a wrong directory.
pub fn extract_from_title(title: &str) -> Option<String> {
    let caps = RE_HOST_TITLE.captures(title)?;
    let parsed = caps.get(1)?.as_str().trim();

    if parsed.contains('/') || parsed.starts_with('~') {
        Some(parsed.to_string())
    } else {
        None
    }
}
