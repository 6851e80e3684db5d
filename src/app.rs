use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::actions::Action;
use crate::kitty::Session;
use crate::presenter::{copy_target, display_info, matches_query};

/// Theme colors
pub struct Theme {
    pub fg: Color,
    pub accent: Color,
    pub dim: Color,
    pub success: Color,
    pub remote: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::Rgb(220, 220, 220),
            accent: Color::Rgb(217, 119, 87),
            dim: Color::Rgb(100, 100, 100),
            success: Color::Rgb(80, 200, 120),
            remote: Color::Rgb(97, 175, 239),
            error: Color::Rgb(220, 53, 69),
        }
    }
}

/// Input mode for the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Searching,
}

/// Main application state
pub struct App {
    /// Sessions from the last successful listing
    pub sessions: Vec<Session>,
    /// Socket of the kitty instance `sessions` came from
    pub socket: Option<String>,
    /// Indices into `sessions` matching the search query
    pub visible: Vec<usize>,
    pub list_state: ListState,
    /// Transient info or error shown in the footer
    pub status_message: Option<String>,
    /// Set while kitty can't be listed; replaces the session list
    pub connection_error: Option<String>,
    /// Whether the first listing has arrived
    pub loaded: bool,
    pub theme: Theme,
    pub input_mode: InputMode,
    pub query: String,
    /// Pending action queue
    pub pending_actions: Vec<Action>,
}

impl App {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            sessions: Vec::new(),
            socket: None,
            visible: Vec::new(),
            list_state,
            status_message: None,
            connection_error: None,
            loaded: false,
            theme: Theme::default(),
            input_mode: InputMode::Normal,
            query: String::new(),
            pending_actions: Vec::new(),
        }
    }

    /// Get the currently selected session
    pub fn selected_session(&self) -> Option<&Session> {
        self.list_state
            .selected()
            .and_then(|i| self.visible.get(i))
            .and_then(|&idx| self.sessions.get(idx))
    }

    /// Take pending actions (drains the queue)
    pub fn take_pending_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.pending_actions)
    }

    /// Handle an action and return whether to quit
    pub fn handle_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::KeyPress(key) => self.handle_key(key),
            Action::SessionsUpdated { socket, sessions } => {
                let selected_id = self.selected_session().map(|s| s.id);
                self.sessions = sessions;
                self.socket = Some(socket);
                self.connection_error = None;
                self.loaded = true;
                self.apply_filter();
                if let Some(id) = selected_id {
                    self.select_by_id(id);
                }
                Ok(false)
            }
            Action::ListingFailed(msg) => {
                self.sessions.clear();
                self.socket = None;
                self.visible.clear();
                self.connection_error = Some(msg);
                self.loaded = true;
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Searching => self.handle_search_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<bool> {
        self.status_message = None;

        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('j') | KeyCode::Down => self.next_session(),
            KeyCode::Char('k') | KeyCode::Up => self.previous_session(),
            KeyCode::Char('/') => self.input_mode = InputMode::Searching,
            KeyCode::Char('r') => self.pending_actions.push(Action::Refresh),
            KeyCode::Enter => {
                // Window ids are per instance, so focus through the listing's socket
                let window_id = self.selected_session().map(|s| s.id);
                if let (Some(window_id), Some(socket)) = (window_id, self.socket.clone()) {
                    self.pending_actions
                        .push(Action::FocusWindow { socket, window_id });
                }
            }
            KeyCode::Char('y') => {
                match self.selected_session().and_then(copy_target) {
                    Some(target) => {
                        self.pending_actions.push(Action::CopyToClipboard(target.content));
                    }
                    None => {
                        if self.selected_session().is_some() {
                            self.status_message = Some("Nothing to copy".to_string());
                        }
                    }
                }
            }
            KeyCode::Esc if !self.query.is_empty() => {
                self.query.clear();
                self.apply_filter();
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Enter => self.input_mode = InputMode::Normal,
            KeyCode::Esc => {
                self.query.clear();
                self.input_mode = InputMode::Normal;
                self.apply_filter();
            }
            KeyCode::Down => self.next_session(),
            KeyCode::Up => self.previous_session(),
            KeyCode::Backspace => {
                self.query.pop();
                self.apply_filter();
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                self.apply_filter();
            }
            _ => {}
        }
        Ok(false)
    }

    /// Recompute visible sessions and keep the selection in range
    fn apply_filter(&mut self) {
        self.visible = self
            .sessions
            .iter()
            .enumerate()
            .filter(|(_, s)| matches_query(s, &self.query))
            .map(|(i, _)| i)
            .collect();

        let selected = self.list_state.selected().unwrap_or(0);
        if self.visible.is_empty() {
            self.list_state.select(Some(0));
        } else if selected >= self.visible.len() {
            self.list_state.select(Some(self.visible.len() - 1));
        }
    }

    fn select_by_id(&mut self, id: u64) {
        if let Some(pos) = self.visible.iter().position(|&i| self.sessions[i].id == id) {
            self.list_state.select(Some(pos));
        }
    }

    fn next_session(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.visible.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous_session(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.visible.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar
                Constraint::Min(0),    // Main content
                Constraint::Length(3), // Footer/status
            ])
            .split(frame.area());

        self.render_search_bar(frame, chunks[0]);
        if let Some(ref err) = self.connection_error {
            self.render_connection_error(frame, chunks[1], err);
        } else {
            self.render_main(frame, chunks[1]);
        }
        self.render_footer(frame, chunks[2]);
    }

    fn render_search_bar(&self, frame: &mut Frame, area: Rect) {
        let searching = self.input_mode == InputMode::Searching;
        let query = if self.query.is_empty() && !searching {
            Span::styled("Search kitty tabs...", Style::default().fg(self.theme.dim))
        } else {
            let cursor = if searching { "_" } else { "" };
            Span::styled(
                format!("{}{}", self.query, cursor),
                Style::default().fg(self.theme.fg).add_modifier(Modifier::BOLD),
            )
        };

        let bar = Paragraph::new(Line::from(vec![
            Span::styled(
                " kitty-tabs ",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("│ ", Style::default().fg(self.theme.dim)),
            query,
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if searching {
                    self.theme.accent
                } else {
                    self.theme.dim
                })),
        );
        frame.render_widget(bar, area);
    }

    fn render_connection_error(&self, frame: &mut Frame, area: Rect, err: &str) {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Could not connect to Kitty",
                Style::default()
                    .fg(self.theme.error)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(format!("  {}", err), Style::default().fg(self.theme.dim))),
        ];

        let paragraph = Paragraph::new(text).block(
            Block::default()
                .title(" Sessions ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.dim)),
        );
        frame.render_widget(paragraph, area);
    }

    fn render_main(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(55), // Session list
                Constraint::Percentage(45), // Detail pane
            ])
            .split(area);

        self.render_session_list(frame, chunks[0]);
        self.render_detail_pane(frame, chunks[1]);
    }

    fn render_session_list(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = if self.visible.is_empty() {
            let msg = if !self.loaded {
                "  Loading..."
            } else if self.query.is_empty() {
                "  No kitty windows found."
            } else {
                "  No matching tabs."
            };
            vec![ListItem::new(Line::from(Span::styled(
                msg,
                Style::default().fg(self.theme.dim),
            )))]
        } else {
            self.visible
                .iter()
                .map(|&idx| {
                    let session = &self.sessions[idx];
                    let info = display_info(session);
                    let icon_color = if session.is_focused {
                        self.theme.success
                    } else if session.is_remote() {
                        self.theme.remote
                    } else {
                        self.theme.dim
                    };

                    ListItem::new(Line::from(vec![
                        Span::styled(format!("{} ", info.icon), Style::default().fg(icon_color)),
                        Span::styled(session.title.clone(), Style::default().fg(self.theme.fg)),
                        Span::styled(format!("  {}", info.subtitle), Style::default().fg(self.theme.dim)),
                    ]))
                })
                .collect()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" Sessions ({}) ", self.visible.len()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.dim)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Rgb(50, 50, 50))
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_detail_pane(&self, frame: &mut Frame, area: Rect) {
        let label = |text: &'static str| Span::styled(text, Style::default().fg(self.theme.dim));

        let content = if let Some(session) = self.selected_session() {
            let info = display_info(session);
            let mut lines = vec![
                Line::from(vec![
                    label("Title: "),
                    Span::styled(session.title.clone(), Style::default().fg(self.theme.fg)),
                ]),
                Line::from(vec![
                    label("Window: "),
                    Span::styled(
                        format!("{} (OS window {})", session.id, session.os_window_id),
                        Style::default().fg(self.theme.fg),
                    ),
                ]),
                Line::from(vec![
                    label("Local: "),
                    Span::styled(session.local_cwd.clone(), Style::default().fg(self.theme.fg)),
                ]),
            ];

            if session.is_remote() {
                lines.push(Line::from(vec![
                    label("Host: "),
                    Span::styled(
                        session.remote_host().unwrap_or("unknown").to_string(),
                        Style::default().fg(self.theme.remote),
                    ),
                ]));
                lines.push(Line::from(vec![
                    label("Remote: "),
                    Span::styled(
                        session.remote_cwd().unwrap_or("unknown").to_string(),
                        Style::default().fg(self.theme.remote),
                    ),
                ]));
            }

            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled(info.accessory, Style::default().fg(self.theme.fg)),
                Span::styled(format!("  {}", info.tooltip), Style::default().fg(self.theme.dim)),
            ]));
            lines.push(Line::from(""));

            let copy_hint = copy_target(session)
                .map(|t| format!(", 'y' to {}", t.label.to_lowercase()))
                .unwrap_or_default();
            lines.push(Line::from(Span::styled(
                format!("Press Enter to switch{}", copy_hint),
                Style::default().fg(self.theme.dim),
            )));
            lines
        } else {
            vec![Line::from(Span::styled(
                "No session selected",
                Style::default().fg(self.theme.dim),
            ))]
        };

        let detail = Paragraph::new(content).block(
            Block::default()
                .title(" Details ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.dim)),
        );
        frame.render_widget(detail, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let help_text = match self.input_mode {
            InputMode::Searching => " Type to filter │ Enter: Done │ Esc: Clear ",
            InputMode::Normal => {
                " q: Quit │ j/k: Navigate │ Enter: Switch │ y: Copy │ /: Search │ r: Refresh "
            }
        };

        let content = if let Some(ref msg) = self.status_message {
            let style = if msg.starts_with("Copied") {
                Style::default().fg(self.theme.success)
            } else {
                Style::default().fg(self.theme.error)
            };
            Line::from(Span::styled(format!(" {} ", msg), style))
        } else {
            Line::from(Span::styled(help_text, Style::default().fg(self.theme.dim)))
        };

        let footer = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.dim)),
        );
        frame.render_widget(footer, area);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
