//! Interactive terminal UI.
//!
//! Uses `ratatui` + `crossterm` for rendering. Key handlers mutate the
//! [`App`] directly for synchronous intents and return an [`Intent`] for
//! the ones that call the API. The event loop draws a loading frame and
//! awaits the request while still polling the keyboard, so a hung request
//! can be cancelled.
#![allow(clippy::future_not_send)]

mod details;
/// View-local TUI state types.
pub mod state;
mod theme;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use moviefav_api::omdb::{LocalMovieApi, MovieSummary};
use moviefav_store::KeyValueStore;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use self::state::{InputMode, TuiState};
use self::ui::Screen;
use crate::app::{App, FavoriteChange, View};

/// Keyboard poll interval of the event loop.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Keyboard poll interval while a request is in flight.
const PENDING_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Notice shown after an in-flight request is abandoned.
const CANCELLED_NOTICE: &str = "Request cancelled";

/// A user intent that needs the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Search by title.
    Search(String),
    /// Open the details modal for an IMDb id.
    Details(String),
}

/// Raw mode and alternate screen, restored on drop.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn acquire() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = crossterm::execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("failed to enter alternate screen");
        }
        let backend = CrosstermBackend::new(stdout);
        let terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(e) => {
                restore_terminal();
                return Err(e).context("failed to create terminal");
            }
        };
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
        let _ = self.terminal.show_cursor();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen);
}

/// Runs the interactive UI until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup, drawing, or event handling fails.
pub async fn run_app<A: LocalMovieApi, S: KeyValueStore>(app: &mut App<A, S>) -> Result<()> {
    let mut guard = TerminalGuard::acquire()?;
    let mut state = TuiState::new();
    if !app.has_api() {
        state.notice = Some(String::from(crate::app::MISSING_API_KEY_MESSAGE));
    }
    tracing::info!("TUI started");
    let result = run_event_loop(&mut guard.terminal, app, &mut state).await;
    tracing::info!("TUI stopped");
    result
}

/// Main event loop.
async fn run_event_loop<A: LocalMovieApi, S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<A, S>,
    state: &mut TuiState,
) -> Result<()> {
    loop {
        state.clamp_selection(View::Search, app.session().search_results.len());
        state.clamp_selection(View::Favorites, app.favorites().len());

        draw_frame(terminal, app, state, None)?;
        if state.should_quit {
            return Ok(());
        }

        if event::poll(POLL_INTERVAL).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
            && let Some(intent) = handle_key(app, state, key)
        {
            draw_frame(terminal, app, state, Some(&intent))?;
            await_intent(app, state, intent, &mut TerminalKeys).await?;
        }
    }
}

/// Non-blocking source of key presses.
trait KeySource {
    /// Returns the next pending key press, if any.
    fn next_key(&mut self) -> Result<Option<KeyEvent>>;
}

/// Reads key presses from the terminal.
struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> Result<Option<KeyEvent>> {
        while event::poll(Duration::ZERO).context("failed to poll events")? {
            if let Event::Key(key) = event::read().context("failed to read event")?
                && key.kind == KeyEventKind::Press
            {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }
}

/// How the user interrupted an in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    /// Abandon the request and stay in the UI.
    Cancel,
    /// Abandon the request and quit.
    Quit,
}

/// Maps a key pressed during a request. Other keys are discarded.
fn interrupt_for(key: KeyEvent) -> Option<Interrupt> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Interrupt::Quit)
        }
        KeyCode::Esc | KeyCode::Char('q') => Some(Interrupt::Cancel),
        _ => None,
    }
}

/// Awaits an API intent while watching `keys` for an interrupt.
///
/// An interrupt drops the request future, which clears the loading flag
/// and leaves the previous results in place.
async fn await_intent<A: LocalMovieApi, S: KeyValueStore, K: KeySource>(
    app: &mut App<A, S>,
    state: &mut TuiState,
    intent: Intent,
    keys: &mut K,
) -> Result<()> {
    let interrupt = {
        let request = dispatch(app, state, intent);
        tokio::pin!(request);
        let mut ticker = tokio::time::interval(PENDING_POLL_INTERVAL);
        loop {
            tokio::select! {
                biased;
                () = &mut request => break None,
                _ = ticker.tick() => {
                    if let Some(interrupt) = keys.next_key()?.and_then(interrupt_for) {
                        break Some(interrupt);
                    }
                }
            }
        }
    };

    match interrupt {
        None => {}
        Some(Interrupt::Cancel) => {
            tracing::info!("In-flight request cancelled");
            state.notice = Some(String::from(CANCELLED_NOTICE));
        }
        Some(Interrupt::Quit) => {
            tracing::info!("Quit while a request was in flight");
            state.should_quit = true;
        }
    }
    Ok(())
}

fn draw_frame<A: LocalMovieApi, S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &App<A, S>,
    state: &mut TuiState,
    pending: Option<&Intent>,
) -> Result<()> {
    let screen = Screen {
        session: app.session(),
        favorites: app.favorites(),
        pending,
    };
    terminal
        .draw(|frame| ui::draw(frame, screen, state))
        .context("failed to draw TUI")?;
    Ok(())
}

/// Awaits an API intent and resets the cursors it invalidates.
async fn dispatch<A: LocalMovieApi, S: KeyValueStore>(
    app: &mut App<A, S>,
    state: &mut TuiState,
    intent: Intent,
) {
    match intent {
        Intent::Search(term) => {
            app.request_search(&term).await;
            state.results_table.select(None);
        }
        Intent::Details(imdb_id) => {
            state.reset_scroll();
            app.request_details(&imdb_id).await;
        }
    }
}

/// Routes a key press. The details modal captures all input while open.
fn handle_key<A: LocalMovieApi, S: KeyValueStore>(
    app: &mut App<A, S>,
    state: &mut TuiState,
    key: KeyEvent,
) -> Option<Intent> {
    state.notice = None;
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.should_quit = true;
        return None;
    }
    if app.session().is_details_modal_open {
        handle_modal_input(app, state, key.code);
        return None;
    }
    match state.input_mode {
        InputMode::Editing => handle_editing_input(state, key.code, key.modifiers),
        InputMode::ConfirmClear => {
            handle_confirm_input(app, state, key.code);
            None
        }
        InputMode::Normal => handle_normal_input(app, state, key.code),
    }
}

/// Handles key input while the details modal is open.
fn handle_modal_input<A: LocalMovieApi, S: KeyValueStore>(
    app: &mut App<A, S>,
    state: &mut TuiState,
    key: KeyCode,
) {
    match key {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.close_details();
            state.reset_scroll();
        }
        KeyCode::Down | KeyCode::Char('j') => state.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => state.scroll_up(),
        KeyCode::Char('f' | ' ') => {
            if let Some(change) = app.toggle_selected_favorite() {
                state.notice = Some(change_notice(change));
            }
        }
        KeyCode::Char('o') => {
            if let Some(movie) = &app.session().selected_movie {
                open_imdb(state, &movie.imdb_id);
            }
        }
        _ => {}
    }
}

/// Handles key input in the search bar. Returns a search on submit.
fn handle_editing_input(
    state: &mut TuiState,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> Option<Intent> {
    match key {
        KeyCode::Esc => state.input_mode = InputMode::Normal,
        KeyCode::Enter => {
            let query = state.submitted_query()?;
            state.input_mode = InputMode::Normal;
            return Some(Intent::Search(query));
        }
        KeyCode::Backspace => state.input_pop(),
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => state.clear_input(),
        KeyCode::Char(c) => state.input_push(c),
        _ => {}
    }
    None
}

/// Handles the clear-all confirmation.
fn handle_confirm_input<A: LocalMovieApi, S: KeyValueStore>(
    app: &mut App<A, S>,
    state: &mut TuiState,
    key: KeyCode,
) {
    state.input_mode = InputMode::Normal;
    if key == KeyCode::Char('y') {
        let removed = app.clear_favorites();
        state.notice = Some(format!("Removed {removed} favorite(s)"));
    }
}

/// Handles key input in normal mode.
fn handle_normal_input<A: LocalMovieApi, S: KeyValueStore>(
    app: &mut App<A, S>,
    state: &mut TuiState,
    key: KeyCode,
) -> Option<Intent> {
    let view = app.session().current_view;
    match key {
        KeyCode::Char('q') => state.should_quit = true,
        KeyCode::Tab | KeyCode::BackTab => app.switch_view(view.toggled()),
        KeyCode::Char('t') => {
            app.toggle_theme();
        }
        KeyCode::Char('/') => {
            app.switch_view(View::Search);
            state.input_mode = InputMode::Editing;
        }
        KeyCode::Esc => app.dismiss_error(),
        KeyCode::Up | KeyCode::Char('k') => state.move_up(view),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(view, visible_len(app, view)),
        KeyCode::Char(' ' | 'f') => {
            let movie = selected_movie(app, state, view)?;
            let change = app.toggle_favorite(&movie);
            state.notice = Some(change_notice(change));
        }
        KeyCode::Enter => {
            let movie = selected_movie(app, state, view)?;
            return Some(Intent::Details(movie.imdb_id));
        }
        KeyCode::Char('C') if view == View::Favorites && !app.favorites().is_empty() => {
            state.input_mode = InputMode::ConfirmClear;
        }
        _ => {}
    }
    None
}

fn visible_len<A: LocalMovieApi, S: KeyValueStore>(app: &App<A, S>, view: View) -> usize {
    match view {
        View::Search => app.session().search_results.len(),
        View::Favorites => app.favorites().len(),
    }
}

/// The movie under the cursor of `view`.
fn selected_movie<A: LocalMovieApi, S: KeyValueStore>(
    app: &App<A, S>,
    state: &TuiState,
    view: View,
) -> Option<MovieSummary> {
    let index = state.selected(view)?;
    let movies = match view {
        View::Search => app.session().search_results.as_slice(),
        View::Favorites => app.favorites().as_slice(),
    };
    movies.get(index).cloned()
}

fn change_notice(change: FavoriteChange) -> String {
    match change {
        FavoriteChange::Added => String::from("Added to favorites"),
        FavoriteChange::Removed => String::from("Removed from favorites"),
    }
}

/// Opens the IMDb page of a title in the default browser.
fn open_imdb(state: &mut TuiState, imdb_id: &str) {
    let url = details::imdb_url(imdb_id);
    if let Err(e) = open::that(&url) {
        tracing::warn!(url, error = %e, "Failed to open browser");
        state.notice = Some(format!("Could not open {url}"));
    }
}
