use super::classifier::{classify_window, DirectoryCache};
use super::error::Result;
use super::{KittyOsWindow, Session};

/// Turns kitty's window tree into a flat list of sessions.
///
/// Owns the directory cache, so one lister should live for the whole run
/// and be the only thing classifying windows.
#[derive(Debug, Default)]
pub struct SessionLister {
    cache: DirectoryCache,
}

impl SessionLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &DirectoryCache {
        &self.cache
    }

    /// Parse `kitty @ ls` output and list its sessions.
    ///
    /// The whole document is parsed before any window is classified, so a
    /// malformed tree yields an error and leaves the cache untouched.
    pub fn list_from_json(&mut self, raw: &str) -> Result<Vec<Session>> {
        let tree: Vec<KittyOsWindow> = serde_json::from_str(raw)?;
        Ok(self.list(&tree))
    }

    /// List sessions in tree order (OS window, tab, window)
    pub fn list(&mut self, tree: &[KittyOsWindow]) -> Vec<Session> {
        let mut sessions = Vec::new();

        for os_window in tree {
            for tab in &os_window.tabs {
                for window in &tab.windows {
                    let kind = classify_window(window, &mut self.cache);

                    sessions.push(Session {
                        id: window.id,
                        title: window.title.clone().unwrap_or_else(|| "Untitled".to_string()),
                        local_cwd: window.cwd.clone().unwrap_or_else(|| "~".to_string()),
                        is_focused: window.is_focused,
                        os_window_id: os_window.id,
                        kind,
                    });
                }
            }
        }

        tracing::debug!(
            count = sessions.len(),
            cached_dirs = self.cache.len(),
            "listed kitty sessions"
        );
        sessions
    }
}
