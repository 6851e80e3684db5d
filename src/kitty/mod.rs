mod classifier;
mod client;
mod cmdline;
mod error;
mod lister;
mod title;

pub use classifier::DirectoryCache;
pub use client::KittyClient;
pub use error::{KittyError, Result};
pub use lister::SessionLister;

use serde::Deserialize;
use std::collections::HashMap;

/// Top-level OS window as reported by `kitty @ ls`
#[derive(Debug, Clone, Deserialize)]
pub struct KittyOsWindow {
    pub id: u64,
    pub tabs: Vec<KittyTab>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KittyTab {
    pub windows: Vec<KittyWindow>,
}

/// A single kitty window (what the UI calls a tab)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KittyWindow {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
    pub is_focused: bool,
    /// Variables exported by shell integration (`PWD` on remote hosts)
    #[serde(default)]
    pub user_vars: Option<HashMap<String, String>>,
    #[serde(default)]
    pub foreground_processes: Option<Vec<ForegroundProcess>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForegroundProcess {
    #[serde(default)]
    pub cmdline: Option<Vec<String>>,
}

/// Where a session is running
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionKind {
    Local,
    Remote {
        /// SSH destination, if it could be parsed from the command line
        host: Option<String>,
        /// Best known remote working directory
        cwd: Option<String>,
    },
}

/// A kitty window classified for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Kitty window id
    pub id: u64,
    pub title: String,
    /// Local working directory (for SSH sessions, the directory ssh was started in)
    pub local_cwd: String,
    pub is_focused: bool,
    /// Id of the OS window the session lives in
    pub os_window_id: u64,
    pub kind: SessionKind,
}

impl Session {
    pub fn is_remote(&self) -> bool {
        matches!(self.kind, SessionKind::Remote { .. })
    }

    pub fn remote_host(&self) -> Option<&str> {
        match &self.kind {
            SessionKind::Remote { host, .. } => host.as_deref(),
            SessionKind::Local => None,
        }
    }

    pub fn remote_cwd(&self) -> Option<&str> {
        match &self.kind {
            SessionKind::Remote { cwd, .. } => cwd.as_deref(),
            SessionKind::Local => None,
        }
    }
}
