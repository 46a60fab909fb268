//! View-local TUI state.
//!
//! Only state that is not part of the application model lives here: the
//! uncommitted search input, table cursors, and the modal scroll offset.

use ratatui::widgets::TableState;

use crate::app::View;

/// Keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Navigation keys act on the active view.
    #[default]
    Normal,
    /// Keys edit the search bar.
    Editing,
    /// Waiting for `y` to confirm clearing favorites.
    ConfirmClear,
}

/// State for the interactive UI.
#[derive(Debug, Default)]
pub struct TuiState {
    /// Search bar text not yet submitted.
    pub input: String,
    /// Current keyboard focus.
    pub input_mode: InputMode,
    /// Cursor of the search results table.
    pub results_table: TableState,
    /// Cursor of the favorites table.
    pub favorites_table: TableState,
    /// First visible line of the details modal.
    pub detail_scroll: u16,
    /// One-shot status message, cleared by the next key press.
    pub notice: Option<String>,
    /// Set to leave the event loop.
    pub should_quit: bool,
}

impl TuiState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a character to the search input.
    pub fn input_push(&mut self, c: char) {
        self.input.push(c);
    }

    /// Removes the last character of the search input.
    pub fn input_pop(&mut self) {
        self.input.pop();
    }

    /// Empties the search input.
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Returns the trimmed input if it is worth submitting.
    #[must_use]
    pub fn submitted_query(&self) -> Option<String> {
        let query = self.input.trim();
        (!query.is_empty()).then(|| String::from(query))
    }

    /// Cursor position in the table of `view`.
    #[must_use]
    pub fn selected(&self, view: View) -> Option<usize> {
        self.table(view).selected()
    }

    /// Moves the cursor of `view` up.
    pub fn move_up(&mut self, view: View) {
        let table = self.table_mut(view);
        if let Some(current) = table.selected() {
            table.select(Some(current.saturating_sub(1)));
        }
    }

    /// Moves the cursor of `view` down, stopping at the last of `len` rows.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_down(&mut self, view: View, len: usize) {
        let table = self.table_mut(view);
        match table.selected() {
            Some(current) if current + 1 < len => table.select(Some(current + 1)),
            None if len > 0 => table.select(Some(0)),
            _ => {}
        }
    }

    /// Keeps the cursor of `view` inside a table of `len` rows, selecting
    /// the first row when nothing is selected.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn clamp_selection(&mut self, view: View, len: usize) {
        let table = self.table_mut(view);
        let next = match table.selected() {
            _ if len == 0 => None,
            Some(current) => Some(current.min(len - 1)),
            None => Some(0),
        };
        table.select(next);
    }

    /// Scrolls the details modal down one line.
    pub const fn scroll_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    /// Scrolls the details modal up one line.
    pub const fn scroll_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }

    /// Resets the details modal to its first line.
    pub const fn reset_scroll(&mut self) {
        self.detail_scroll = 0;
    }

    const fn table(&self, view: View) -> &TableState {
        match view {
            View::Search => &self.results_table,
            View::Favorites => &self.favorites_table,
        }
    }

    const fn table_mut(&mut self, view: View) -> &mut TableState {
        match view {
            View::Search => &mut self.results_table,
            View::Favorites => &mut self.favorites_table,
        }
    }
}
