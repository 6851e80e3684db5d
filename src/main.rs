use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

mod actions;
mod app;
mod config;
mod kitty;
mod presenter;

use actions::Action;
use app::App;
use config::Config;
use kitty::{KittyClient, Session, SessionLister};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(log_writer())
        .with_ansi(false)
        .init();

    let config = Config::load().context("Failed to load configuration")?;
    tracing::info!(?config, "starting kitty-tabs");

    // Create event channels
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
    let (refresh_tx, refresh_rx) = mpsc::unbounded_channel::<()>();

    // Initialize terminal
    let mut terminal = ratatui::init();

    // Spawn input handler
    let input_tx = tx.clone();
    tokio::spawn(async move {
        loop {
            if event::poll(Duration::from_millis(100)).unwrap_or(false) {
                if let Ok(Event::Key(key)) = event::read() {
                    if key.kind == KeyEventKind::Press {
                        let _ = input_tx.send(Action::KeyPress(key));
                    }
                }
            }
        }
    });

    // Spawn kitty poller; it owns the only directory cache
    tokio::spawn(poll_sessions(config.clone(), tx.clone(), refresh_rx));

    // Create app state
    let mut app = App::new();

    // Main event loop
    let result = loop {
        // Render
        terminal.draw(|f| app.render(f))?;

        // Process any pending actions from the app
        let mut switched = false;
        for pending_action in app.take_pending_actions() {
            match pending_action {
                Action::FocusWindow { socket, window_id } => match KittyClient::new(&config, socket)
                    .focus_window(window_id)
                    .await
                {
                    Ok(()) => {
                        tracing::info!(window_id, "switched to tab");
                        switched = true;
                    }
                    Err(e) => {
                        tracing::warn!(window_id, error = %e, "failed to switch tab");
                        app.status_message = Some(format!("Failed to switch tab: {}", e));
                    }
                },
                Action::CopyToClipboard(ref text) => match arboard::Clipboard::new() {
                    Ok(mut clipboard) => {
                        if let Err(e) = clipboard.set_text(text.as_str()) {
                            app.status_message = Some(format!("Clipboard error: {}", e));
                        } else {
                            app.status_message = Some(format!("Copied {}", text));
                        }
                    }
                    Err(e) => {
                        app.status_message = Some(format!("Clipboard error: {}", e));
                    }
                },
                Action::Refresh => {
                    let _ = refresh_tx.send(());
                }
                _ => {}
            }
        }

        if switched {
            break Ok(());
        }

        // Handle events from channel
        tokio::select! {
            Some(action) = rx.recv() => {
                match app.handle_action(action) {
                    Ok(should_quit) => {
                        if should_quit {
                            break Ok(());
                        }
                    }
                    Err(e) => {
                        break Err(e);
                    }
                }
            }
        }
    };

    // Restore terminal
    ratatui::restore();
    result
}

/// Poll kitty for sessions until the UI goes away
async fn poll_sessions(
    config: Config,
    tx: mpsc::UnboundedSender<Action>,
    mut refresh_rx: mpsc::UnboundedReceiver<()>,
) {
    let mut lister = SessionLister::new();
    let mut client: Option<KittyClient> = None;
    let interval = Duration::from_millis(config.poll_interval_ms);

    loop {
        let action = match list_sessions(&config, &mut client, &mut lister).await {
            Ok((socket, sessions)) => Action::SessionsUpdated { socket, sessions },
            Err(e) => {
                tracing::warn!(error = %e, "failed to list kitty sessions");
                // Rediscover the socket next time; kitty may have restarted
                client = None;
                Action::ListingFailed(e.to_string())
            }
        };

        if tx.send(action).is_err() {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            Some(()) = refresh_rx.recv() => {}
        }
    }
}

/// List sessions along with the socket they were listed from
async fn list_sessions(
    config: &Config,
    client: &mut Option<KittyClient>,
    lister: &mut SessionLister,
) -> kitty::Result<(String, Vec<Session>)> {
    let client = match client {
        Some(client) => client,
        None => client.insert(KittyClient::connect(config)?),
    };

    let raw = client.ls().await?;
    let sessions = lister.list_from_json(&raw)?;
    Ok((client.socket().to_string(), sessions))
}

/// Logs go to a file; stdout belongs to the TUI
fn log_writer() -> BoxMakeWriter {
    let Some(dir) = dirs::cache_dir().map(|d| d.join("kitty-tabs")) else {
        return BoxMakeWriter::new(std::io::sink);
    };

    let file = std::fs::create_dir_all(&dir).and_then(|_| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("kitty-tabs.log"))
    });

    match file {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(_) => BoxMakeWriter::new(std::io::sink),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    /// Stand-in for `kitty` that answers every `@` command with an empty tree
    fn fake_kitty(dir: &Path) -> String {
        let path = dir.join("kitty");
        std::fs::write(&path, "#!/bin/sh\necho '[]'\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().to_string()
    }

    /// `KITTY_LISTEN_ON` overrides the socket directory
    fn inside_kitty() -> bool {
        std::env::var("KITTY_LISTEN_ON").is_ok_and(|v| !v.is_empty())
    }

    fn touch_socket(dir: &Path, name: &str, age_secs: u64) {
        let file = std::fs::File::create(dir.join(name)).unwrap();
        let modified = std::time::SystemTime::now() - Duration::from_secs(age_secs);
        file.set_modified(modified).unwrap();
    }

    #[tokio::test]
    async fn test_listing_keeps_its_socket_when_newer_instance_appears() {
        if inside_kitty() {
            return;
        }
        let bin_dir = tempfile::tempdir().unwrap();
        let socket_dir = tempfile::tempdir().unwrap();
        touch_socket(socket_dir.path(), "kitty-100", 60);

        let config = Config {
            kitty_bin: fake_kitty(bin_dir.path()),
            socket_dir: socket_dir.path().to_path_buf(),
            ..Config::default()
        };
        let mut client = None;
        let mut lister = SessionLister::new();

        let (first, sessions) = list_sessions(&config, &mut client, &mut lister).await.unwrap();
        assert!(first.ends_with("kitty-100"));
        assert!(sessions.is_empty());

        touch_socket(socket_dir.path(), "kitty-200", 0);
        let (second, _) = list_sessions(&config, &mut client, &mut lister).await.unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_listing_without_socket_fails() {
        if inside_kitty() {
            return;
        }
        let socket_dir = tempfile::tempdir().unwrap();
        let config = Config {
            socket_dir: socket_dir.path().to_path_buf(),
            ..Config::default()
        };
        let mut client = None;
        let mut lister = SessionLister::new();

        let err = list_sessions(&config, &mut client, &mut lister).await.unwrap_err();
        assert!(matches!(err, kitty::KittyError::SocketNotFound));
        assert!(client.is_none());
    }
}
