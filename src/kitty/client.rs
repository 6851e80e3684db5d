use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, SystemTime};

use tokio::process::Command;
use walkdir::WalkDir;

use super::error::{KittyError, Result};
use crate::config::Config;

/// Set by kitty in every child process when remote control is listening
const LISTEN_ON_ENV: &str = "KITTY_LISTEN_ON";

/// Locate the kitty control socket to talk to.
///
/// Prefers `KITTY_LISTEN_ON` (set when running inside kitty), otherwise the
/// most recently modified `<prefix>*` entry in the socket directory.
pub fn find_socket(config: &Config) -> Option<String> {
    find_socket_from(std::env::var(LISTEN_ON_ENV).ok(), config)
}

fn find_socket_from(listen_on: Option<String>, config: &Config) -> Option<String> {
    if let Some(listen_on) = listen_on.filter(|s| !s.is_empty()) {
        tracing::info!(socket = %listen_on, "using socket from {}", LISTEN_ON_ENV);
        return Some(listen_on);
    }

    let socket = newest_socket(&config.socket_dir, &config.socket_prefix)?;
    tracing::info!(%socket, "found kitty socket");
    Some(socket)
}

/// Newest entry in `dir` whose name starts with `prefix`, as a `unix:` address
fn newest_socket(dir: &Path, prefix: &str) -> Option<String> {
    let mut candidates: Vec<(SystemTime, String)> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
        .map(|entry| {
            // Unreadable metadata sorts last
            let modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, entry.path().to_string_lossy().to_string())
        })
        .collect();

    candidates.sort_by(|a, b| b.0.cmp(&a.0));
    candidates
        .into_iter()
        .next()
        .map(|(_, path)| format!("unix:{}", path))
}

/// Client for kitty's remote control protocol via `kitty @`
pub struct KittyClient {
    /// Path to kitty binary
    kitty_bin: String,
    /// Address passed to `--to`
    socket: String,
    timeout: Duration,
}

impl KittyClient {
    pub fn new(config: &Config, socket: String) -> Self {
        Self {
            kitty_bin: config.kitty_bin.clone(),
            socket,
            timeout: Duration::from_millis(config.command_timeout_ms),
        }
    }

    /// Find a socket and build a client for it
    pub fn connect(config: &Config) -> Result<Self> {
        let socket = find_socket(config).ok_or(KittyError::SocketNotFound)?;
        Ok(Self::new(config, socket))
    }

    /// Address of the instance this client talks to
    pub fn socket(&self) -> &str {
        &self.socket
    }

    /// Raw JSON window tree from `kitty @ ls`
    pub async fn ls(&self) -> Result<String> {
        self.run("ls", &[]).await
    }

    /// Focus a window by kitty window id
    pub async fn focus_window(&self, window_id: u64) -> Result<()> {
        let matcher = format!("id:{}", window_id);
        self.run("focus-window", &["--match", matcher.as_str()]).await?;
        Ok(())
    }

    async fn run(&self, command: &str, args: &[&str]) -> Result<String> {
        let child = Command::new(&self.kitty_bin)
            .args(["@", "--to", self.socket.as_str(), command])
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| KittyError::Timeout(self.timeout.as_millis() as u64))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(KittyError::CommandFailed {
                command: command.to_string(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
