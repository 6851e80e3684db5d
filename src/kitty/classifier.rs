use std::collections::HashMap;

use super::cmdline::{extract_hostname, is_ssh_command};
use super::title::extract_from_title;
use super::{KittyWindow, SessionKind};

/// Last known remote directory per kitty window id.
///
/// Full-screen programs (vi, less, htop) hide both the shell-integration
/// `PWD` and the `host: path` title, so the directory seen before they
/// started is remembered here. Only positively resolved directories are
/// stored. Never persisted.
#[derive(Debug, Default, Clone)]
pub struct DirectoryCache {
    dirs: HashMap<u64, String>,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, window_id: u64) -> Option<&str> {
        self.dirs.get(&window_id).map(String::as_str)
    }

    pub fn insert(&mut self, window_id: u64, dir: String) {
        self.dirs.insert(window_id, dir);
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

/// Classify a window as local or SSH and resolve its remote directory
pub fn classify_window(window: &KittyWindow, cache: &mut DirectoryCache) -> SessionKind {
    let ssh_cmdline = window
        .foreground_processes
        .iter()
        .flatten()
        .filter_map(|process| process.cmdline.as_deref())
        .find(|cmdline| is_ssh_command(cmdline));

    let Some(cmdline) = ssh_cmdline else {
        return SessionKind::Local;
    };

    let host = extract_hostname(cmdline);

    // Priority: shell integration > window title > cache
    let live_cwd = window
        .user_vars
        .as_ref()
        .and_then(|vars| vars.get("PWD"))
        .filter(|pwd| !pwd.is_empty())
        .cloned()
        .or_else(|| window.title.as_deref().and_then(extract_from_title));

    let cwd = match live_cwd {
        Some(dir) => {
            cache.insert(window.id, dir.clone());
            Some(dir)
        }
        None => cache.get(window.id).map(str::to_string),
    };

    tracing::debug!(window_id = window.id, ?host, ?cwd, "classified ssh window");

    SessionKind::Remote { host, cwd }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kitty::ForegroundProcess;

    fn ssh_window(id: u64, title: &str, pwd: Option<&str>) -> KittyWindow {
        KittyWindow {
            id,
            title: Some(title.to_string()),
            cwd: Some("/Users/me".to_string()),
            is_focused: false,
            user_vars: pwd.map(|p| HashMap::from([("PWD".to_string(), p.to_string())])),
            foreground_processes: Some(vec![ForegroundProcess {
                cmdline: Some(vec!["ssh".to_string(), "box1".to_string()]),
            }]),
        }
    }

    fn remote(host: &str, cwd: Option<&str>) -> SessionKind {
        SessionKind::Remote {
            host: Some(host.to_string()),
            cwd: cwd.map(str::to_string),
        }
    }

    #[test]
    fn test_local_window_leaves_cache_alone() {
        let mut cache = DirectoryCache::new();
        let window = KittyWindow {
            id: 3,
            title: Some("me: ~/src".to_string()),
            foreground_processes: Some(vec![ForegroundProcess {
                cmdline: Some(vec!["vim".to_string()]),
            }]),
            ..Default::default()
        };

        assert_eq!(classify_window(&window, &mut cache), SessionKind::Local);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_first_ssh_process_wins() {
        let mut cache = DirectoryCache::new();
        let window = KittyWindow {
            id: 1,
            foreground_processes: Some(vec![
                ForegroundProcess { cmdline: None },
                ForegroundProcess {
                    cmdline: Some(vec!["zsh".to_string()]),
                },
                ForegroundProcess {
                    cmdline: Some(vec!["kitten".to_string(), "ssh".to_string(), "first".to_string()]),
                },
                ForegroundProcess {
                    cmdline: Some(vec!["ssh".to_string(), "second".to_string()]),
                },
            ]),
            ..Default::default()
        };

        assert_eq!(classify_window(&window, &mut cache), remote("first", None));
    }

    #[test]
    fn test_pwd_beats_title() {
        let mut cache = DirectoryCache::new();
        let window = ssh_window(1, "box1: /from/title", Some("/from/pwd"));

        assert_eq!(classify_window(&window, &mut cache), remote("box1", Some("/from/pwd")));
        assert_eq!(cache.get(1), Some("/from/pwd"));
    }

    #[test]
    fn test_empty_pwd_falls_through_to_title() {
        let mut cache = DirectoryCache::new();
        let window = ssh_window(1, "box1: /srv", Some(""));

        assert_eq!(classify_window(&window, &mut cache), remote("box1", Some("/srv")));
    }

    #[test]
    fn test_title_used_without_pwd() {
        let mut cache = DirectoryCache::new();
        let window = ssh_window(1, "box1: ~/app", None);

        assert_eq!(classify_window(&window, &mut cache), remote("box1", Some("~/app")));
        assert_eq!(cache.get(1), Some("~/app"));
    }

    #[test]
    fn test_cache_fallback_when_editor_running() {
        let mut cache = DirectoryCache::new();

        classify_window(&ssh_window(7, "box1: zsh", Some("/a/b")), &mut cache);
        let kind = classify_window(&ssh_window(7, "box1: vim", None), &mut cache);

        assert_eq!(kind, remote("box1", Some("/a/b")));
    }

    #[test]
    fn test_cache_overwritten_by_newer_directory() {
        let mut cache = DirectoryCache::new();

        classify_window(&ssh_window(7, "box1: zsh", Some("/a/b")), &mut cache);
        classify_window(&ssh_window(7, "box1: zsh", Some("/c/d")), &mut cache);
        let kind = classify_window(&ssh_window(7, "box1: vim", None), &mut cache);

        assert_eq!(kind, remote("box1", Some("/c/d")));
        assert_eq!(cache.get(7), Some("/c/d"));
    }

    #[test]
    fn test_cache_is_per_window() {
        let mut cache = DirectoryCache::new();

        classify_window(&ssh_window(1, "box1: zsh", Some("/a/b")), &mut cache);
        let kind = classify_window(&ssh_window(2, "box1: vim", None), &mut cache);

        assert_eq!(kind, remote("box1", None));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_unresolvable_host_and_cwd() {
        let mut cache = DirectoryCache::new();
        let window = KittyWindow {
            id: 4,
            foreground_processes: Some(vec![ForegroundProcess {
                cmdline: Some(vec!["/usr/bin/ssh".to_string(), "-v".to_string()]),
            }]),
            ..Default::default()
        };

        assert_eq!(
            classify_window(&window, &mut cache),
            SessionKind::Remote { host: None, cwd: None }
        );
        assert!(cache.is_empty());
    }
}
