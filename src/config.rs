//! User configuration, read from `<config dir>/kitty-tabs/config.json`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

const MIN_POLL_INTERVAL_MS: u64 = 250;
const MIN_COMMAND_TIMEOUT_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Path to the kitty binary used for `kitty @` commands
    #[serde(default = "default_kitty_bin")]
    pub kitty_bin: String,

    /// Directory scanned for control sockets
    #[serde(default = "default_socket_dir")]
    pub socket_dir: PathBuf,

    /// Kitty names its sockets `<prefix><pid>`
    #[serde(default = "default_socket_prefix")]
    pub socket_prefix: String,

    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_kitty_bin() -> String {
    "kitty".to_string()
}

fn default_socket_dir() -> PathBuf {
    PathBuf::from("/tmp")
}

fn default_socket_prefix() -> String {
    "kitty-".to_string()
}

fn default_command_timeout_ms() -> u64 {
    5000
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kitty_bin: default_kitty_bin(),
            socket_dir: default_socket_dir(),
            socket_prefix: default_socket_prefix(),
            command_timeout_ms: default_command_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Config {
    /// Load configuration from disk, or return defaults if there is none
    pub fn load() -> Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate();
        Ok(config)
    }

    /// Clamp intervals so a typo can't spin the poller or starve kitty
    pub fn validate(&mut self) {
        self.poll_interval_ms = self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS);
        self.command_timeout_ms = self.command_timeout_ms.max(MIN_COMMAND_TIMEOUT_MS);
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kitty-tabs").join("config.json"))
    }
}
