use crossterm::event::KeyEvent;

use crate::kitty::Session;

/// Actions that can be dispatched through the application
#[derive(Debug, Clone)]
pub enum Action {
    /// A key was pressed
    KeyPress(KeyEvent),
    /// Sessions were listed from the kitty instance behind `socket`
    SessionsUpdated { socket: String, sessions: Vec<Session> },
    /// Kitty could not be reached or returned unusable data
    ListingFailed(String),
    /// Focus a kitty window by id, on the instance it was listed from
    FocusWindow { socket: String, window_id: u64 },
    /// Copy text to the system clipboard
    CopyToClipboard(String),
    /// Ask the poller for a fresh listing now
    Refresh,
}
