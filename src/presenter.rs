use crate::kitty::Session;

pub const ICON_FOCUSED: &str = "✔";
pub const ICON_TERMINAL: &str = "▣";
pub const ICON_GLOBE: &str = "◍";
pub const EMOJI_LOCAL: &str = "🏠";
pub const EMOJI_REMOTE: &str = "🌍";

/// What the session list shows for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayInfo {
    pub icon: &'static str,
    pub subtitle: String,
    pub accessory: String,
    pub tooltip: String,
}

/// Value offered by the copy action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTarget {
    pub label: &'static str,
    pub content: String,
}

/// Last component of a path, or the path itself
pub fn short_path(path: &str) -> &str {
    match path.rsplit('/').next() {
        Some(last) if !last.is_empty() => last,
        _ => path,
    }
}

pub fn display_info(session: &Session) -> DisplayInfo {
    let remote = session.is_remote();

    let icon = if session.is_focused {
        ICON_FOCUSED
    } else if remote {
        ICON_GLOBE
    } else {
        ICON_TERMINAL
    };

    if !remote {
        return DisplayInfo {
            icon,
            subtitle: short_path(&session.local_cwd).to_string(),
            accessory: format!("{} {}", EMOJI_LOCAL, session.local_cwd),
            tooltip: "Local Working Directory".to_string(),
        };
    }

    let host = session.remote_host().unwrap_or("remote");
    let location = session.remote_cwd().unwrap_or(host);
    let tooltip = match session.remote_cwd() {
        Some(cwd) => format!("Remote: {}", cwd),
        None => "SSH Session".to_string(),
    };

    DisplayInfo {
        icon,
        subtitle: host.to_string(),
        accessory: format!("{} {}", EMOJI_REMOTE, location),
        tooltip,
    }
}

/// The directory or host worth copying for this session
pub fn copy_target(session: &Session) -> Option<CopyTarget> {
    if !session.is_remote() {
        return Some(CopyTarget {
            label: "Copy Working Directory",
            content: session.local_cwd.clone(),
        });
    }

    if let Some(cwd) = session.remote_cwd() {
        return Some(CopyTarget {
            label: "Copy Remote Directory",
            content: cwd.to_string(),
        });
    }

    session.remote_host().map(|host| CopyTarget {
        label: "Copy SSH Host",
        content: host.to_string(),
    })
}

/// Case-insensitive search over everything the list displays
pub fn matches_query(session: &Session, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    [
        Some(session.title.as_str()),
        Some(session.local_cwd.as_str()),
        session.remote_host(),
        session.remote_cwd(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kitty::SessionKind;

    fn local(cwd: &str, focused: bool) -> Session {
        Session {
            id: 1,
            title: "zsh".to_string(),
            local_cwd: cwd.to_string(),
            is_focused: focused,
            os_window_id: 1,
            kind: SessionKind::Local,
        }
    }

    fn remote(host: Option<&str>, cwd: Option<&str>) -> Session {
        Session {
            id: 2,
            title: "Deploy".to_string(),
            local_cwd: "/Users/me".to_string(),
            is_focused: false,
            os_window_id: 1,
            kind: SessionKind::Remote {
                host: host.map(str::to_string),
                cwd: cwd.map(str::to_string),
            },
        }
    }

    #[test]
    fn test_short_path() {
        assert_eq!(short_path("/Users/me/src/app"), "app");
        assert_eq!(short_path("~"), "~");
        assert_eq!(short_path("/Users/me/"), "/Users/me/");
    }

    #[test]
    fn test_local_display() {
        let info = display_info(&local("/Users/me/src/app", false));
        assert_eq!(info.icon, ICON_TERMINAL);
        assert_eq!(info.subtitle, "app");
        assert_eq!(info.accessory, "🏠 /Users/me/src/app");
        assert_eq!(info.tooltip, "Local Working Directory");
    }

    #[test]
    fn test_focused_icon_wins() {
        assert_eq!(display_info(&local("/tmp", true)).icon, ICON_FOCUSED);

        let mut session = remote(Some("web1"), None);
        session.is_focused = true;
        assert_eq!(display_info(&session).icon, ICON_FOCUSED);
    }

    #[test]
    fn test_remote_display_with_cwd() {
        let info = display_info(&remote(Some("web1"), Some("/var/www")));
        assert_eq!(info.icon, ICON_GLOBE);
        assert_eq!(info.subtitle, "web1");
        assert_eq!(info.accessory, "🌍 /var/www");
        assert_eq!(info.tooltip, "Remote: /var/www");
    }

    #[test]
    fn test_remote_display_fallbacks() {
        let info = display_info(&remote(Some("web1"), None));
        assert_eq!(info.accessory, "🌍 web1");
        assert_eq!(info.tooltip, "SSH Session");

        let info = display_info(&remote(None, None));
        assert_eq!(info.subtitle, "remote");
        assert_eq!(info.accessory, "🌍 remote");
    }

    #[test]
    fn test_copy_target() {
        assert_eq!(
            copy_target(&local("/tmp/x", false)),
            Some(CopyTarget {
                label: "Copy Working Directory",
                content: "/tmp/x".to_string()
            })
        );
        assert_eq!(
            copy_target(&remote(Some("web1"), Some("~/app"))).map(|t| t.content),
            Some("~/app".to_string())
        );
        assert_eq!(
            copy_target(&remote(Some("web1"), None)).map(|t| t.label),
            Some("Copy SSH Host")
        );
        assert_eq!(copy_target(&remote(None, None)), None);
    }

    #[test]
    fn test_matches_query() {
        let session = remote(Some("web1.example.com"), Some("/var/www"));
        assert!(matches_query(&session, ""));
        assert!(matches_query(&session, "deploy"));
        assert!(matches_query(&session, "WEB1"));
        assert!(matches_query(&session, "var/w"));
        assert!(matches_query(&session, "users/me"));
        assert!(!matches_query(&session, "db2"));
        assert!(!matches_query(&local("/tmp", false), "web1"));
    }
}
