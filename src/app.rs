//! App state and keyboard handling for the interactive TUI
//!
//! The `App` is a thin shell around a [`SearchSession`]: it owns the text
//! cursor, list selection and exit confirmation, and forwards every user
//! action to the session. Rendering reads the latest session snapshot.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::SearchResultItem;
use crate::session::{SearchSession, SessionState, View};

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

// =============================================================================
// Selection State
// =============================================================================

/// Selection state for the result list
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset for viewport
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    /// Move selection up
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
        if self.selected < self.offset {
            self.offset = self.selected;
        }
    }

    pub fn page_down(&mut self, page_size: usize) {
        if self.len > 0 {
            self.selected = (self.selected + page_size).min(self.len - 1);
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Update offset to keep selected item visible
    pub fn scroll_into_view(&mut self, visible_height: usize) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if visible_height > 0 && self.selected >= self.offset + visible_height {
            self.offset = self.selected - visible_height + 1;
        }
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Update length, clamping the selection
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
            self.offset = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// Main Application State
// =============================================================================

pub struct App {
    /// The session every action is forwarded to
    pub session: SearchSession,
    /// Latest snapshot, refreshed by `sync`
    pub snapshot: SessionState,
    /// Whether the app is running
    pub running: bool,
    pub input_mode: InputMode,
    /// Search box contents
    pub input: String,
    /// Cursor position in `input`, in characters
    pub cursor: usize,
    pub list: ListState,
    /// Exit confirmation prompt is showing
    pub confirm_exit: bool,
}

impl App {
    pub fn new(session: SearchSession) -> Self {
        let snapshot = session.state();
        Self {
            session,
            snapshot,
            running: true,
            input_mode: InputMode::Normal,
            input: String::new(),
            cursor: 0,
            list: ListState::default(),
            confirm_exit: false,
        }
    }

    /// Pull the latest session state
    pub fn sync(&mut self) {
        self.snapshot = self.session.state();
        self.list.set_len(self.snapshot.results.len());
    }

    pub fn view(&self) -> View {
        self.snapshot.view()
    }

    pub fn selected_result(&self) -> Option<&SearchResultItem> {
        self.snapshot.results.get(self.list.selected)
    }

    pub fn quit(&mut self) {
        self.running = false;
        self.session.close();
    }

    // -------------------------------------------------------------------------
    // Query editing
    // -------------------------------------------------------------------------

    fn byte_index(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn publish_query(&mut self) {
        self.session.update_query(self.input.clone());
    }

    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.input.insert(idx, c);
        self.cursor += 1;
        self.publish_query();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index(self.cursor);
            self.input.remove(idx);
            self.publish_query();
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let idx = self.byte_index(self.cursor);
            self.input.remove(idx);
            self.publish_query();
        }
    }

    /// Submit the query
    pub fn submit(&mut self) {
        self.input_mode = InputMode::Normal;
        self.list.reset();
        self.session.search();
    }

    /// Reset session and local UI state
    pub fn clear_all(&mut self) {
        self.session.clear_all();
        self.input.clear();
        self.cursor = 0;
        self.list.reset();
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        let consumed = if self.confirm_exit {
            self.handle_confirm_key(key)
        } else if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key)
        } else if self.view() == View::Detail {
            self.handle_detail_key(key)
        } else {
            self.handle_list_key(key)
        };

        self.sync();
        consumed
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => self.quit(),
            _ => self.confirm_exit = false,
        }
        true
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => self.submit(),
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.input.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.chars().count(),
            _ => return false,
        }
        true
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Char('q') => {
                self.session.clear_selected();
                true
            }
            _ => false,
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('/') | KeyCode::Char('i') => self.input_mode = InputMode::Editing,
            KeyCode::Esc | KeyCode::Char('q') => self.confirm_exit = true,
            KeyCode::Up | KeyCode::Char('k') => self.list.up(),
            KeyCode::Down | KeyCode::Char('j') => self.list.down(),
            KeyCode::PageUp => self.list.page_up(10),
            KeyCode::PageDown => self.list.page_down(10),
            KeyCode::Home => self.list.first(),
            KeyCode::End => self.list.last(),
            KeyCode::Enter => {
                if let Some(id) = self.selected_result().map(|r| r.imdb_id.clone()) {
                    self.session.get_details(id);
                }
            }
            KeyCode::Char('r') => self.session.force_refresh(),
            KeyCode::Char('x') => self.session.clear_error(),
            KeyCode::Char('c') => self.clear_all(),
            _ => return false,
        }
        true
    }
}
