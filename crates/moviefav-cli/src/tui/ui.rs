//! TUI rendering logic.

use moviefav_api::omdb::{MediaType, MovieSummary};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, Tabs, Wrap};

use super::Intent;
use super::details::detail_lines;
use super::state::{InputMode, TuiState};
use super::theme::Palette;
use crate::app::{FavoritesSet, SessionState, View};

const SEARCH_PLACEHOLDER: &str = "Search for movies... (e.g., Inception, Avatar, Titanic)";

/// Everything one frame is drawn from.
#[derive(Debug, Clone, Copy)]
pub struct Screen<'a> {
    /// Application session state.
    pub session: &'a SessionState,
    /// Saved favorites.
    pub favorites: &'a FavoritesSet,
    /// Request about to be awaited, drawn as a loading indicator.
    pub pending: Option<&'a Intent>,
}

impl Screen<'_> {
    fn is_loading(&self) -> bool {
        self.session.is_loading || self.pending.is_some()
    }

    fn loading_text(&self) -> &'static str {
        match self.pending {
            Some(Intent::Details(_)) => "Loading details...",
            _ => "Loading movies...",
        }
    }
}

/// Draws the whole UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, screen: Screen<'_>, state: &mut TuiState) {
    let palette = Palette::for_mode(screen.session.is_dark_mode);
    frame.render_widget(Block::default().style(palette.base()), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // search bar / favorites summary
            Constraint::Length(1), // status line
            Constraint::Min(5),    // main content
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], screen, &palette);
    match screen.session.current_view {
        View::Search => {
            draw_search_bar(frame, chunks[1], state, &palette);
            draw_status(frame, chunks[2], screen, state, &palette);
            draw_results(frame, chunks[3], screen, state, &palette);
        }
        View::Favorites => {
            draw_favorites_summary(frame, chunks[1], screen.favorites, &palette);
            draw_status(frame, chunks[2], screen, state, &palette);
            draw_favorites(frame, chunks[3], screen.favorites, state, &palette);
        }
    }
    draw_footer(frame, chunks[4], screen, state, &palette);

    if state.input_mode == InputMode::ConfirmClear {
        draw_confirm_clear(frame, screen.favorites.len(), &palette);
    }
    if screen.session.is_details_modal_open {
        draw_details(frame, screen, state, &palette);
    }
}

/// Draws the title, tab bar and theme indicator.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, screen: Screen<'_>, palette: &Palette) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let selected = match screen.session.current_view {
        View::Search => 0,
        View::Favorites => 1,
    };
    let favorites_tab = if screen.favorites.is_empty() {
        String::from("Favorites")
    } else {
        format!("Favorites ({})", screen.favorites.len())
    };
    let tabs = Tabs::new(vec![String::from("Search"), favorites_tab])
        .select(selected)
        .style(Style::default().fg(palette.muted))
        .highlight_style(palette.header())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Movie Search App "),
        );
    frame.render_widget(tabs, header_chunks[0]);

    let theme = if screen.session.is_dark_mode {
        "Dark mode  (t: light)"
    } else {
        "Light mode  (t: dark)"
    };
    let indicator = Paragraph::new(theme)
        .alignment(Alignment::Right)
        .style(Style::default().fg(palette.muted))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(indicator, header_chunks[1]);
}

/// Draws the search input.
fn draw_search_bar(frame: &mut Frame, area: Rect, state: &TuiState, palette: &Palette) {
    let editing = state.input_mode == InputMode::Editing;
    let border_style = if editing {
        Style::default().fg(palette.accent)
    } else {
        Style::default()
    };

    let text = if state.input.is_empty() && !editing {
        Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(palette.muted))
    } else if editing {
        Span::raw(format!("{}\u{2588}", state.input))
    } else {
        Span::raw(state.input.clone())
    };

    let bar = Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Search: / "),
    );
    frame.render_widget(bar, area);
}

/// Draws the favorites count and totals by type.
fn draw_favorites_summary(frame: &mut Frame, area: Rect, favorites: &FavoritesSet, palette: &Palette) {
    let text = if favorites.is_empty() {
        String::from("No favorite movies yet. Start by searching and adding movies you love!")
    } else {
        let noun = if favorites.len() == 1 { "movie" } else { "movies" };
        format!(
            "You have {} favorite {noun}    Total: {}  Movies: {}  TV Series: {}",
            favorites.len(),
            favorites.len(),
            favorites.count_of(&MediaType::Movie),
            favorites.count_of(&MediaType::Series),
        )
    };
    let summary = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.favorite))
            .title(" My Favorite Movies "),
    );
    frame.render_widget(summary, area);
}

/// Draws the loading indicator, error banner or notice.
fn draw_status(frame: &mut Frame, area: Rect, screen: Screen<'_>, state: &TuiState, palette: &Palette) {
    let line = if screen.is_loading() {
        Line::from(Span::styled(
            format!("\u{23f3} {}", screen.loading_text()),
            Style::default().fg(palette.accent),
        ))
    } else if let Some(error) = &screen.session.error_message {
        Line::from(Span::styled(
            format!("\u{26a0} {error}"),
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        ))
    } else if let Some(notice) = &state.notice {
        Line::from(Span::styled(notice.clone(), Style::default().fg(palette.muted)))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Draws the search results, or the welcome / no-results text.
fn draw_results(
    frame: &mut Frame,
    area: Rect,
    screen: Screen<'_>,
    state: &mut TuiState,
    palette: &Palette,
) {
    let session = screen.session;
    if screen.is_loading() && !matches!(screen.pending, Some(Intent::Details(_))) {
        draw_message(frame, area, &[screen.loading_text()], palette);
        return;
    }
    if session.search_results.is_empty() {
        if session.search_term.is_empty() {
            draw_message(
                frame,
                area,
                &[
                    "Welcome to Movie Search App",
                    "",
                    "Press / to search, Enter to view details,",
                    "Space to add a movie to your favorites.",
                ],
                palette,
            );
        } else if session.error_message.is_none() {
            draw_message(
                frame,
                area,
                &["No movies found", "Try searching for a different movie title"],
                palette,
            );
        }
        return;
    }

    let title = format!(
        " Search Results for \"{}\" ({} movies found) ",
        session.search_term,
        session.search_results.len()
    );
    let table = movie_table(&session.search_results, screen.favorites, &title, palette);
    frame.render_stateful_widget(table, area, &mut state.results_table);
}

/// Draws the favorites table, or the empty-state text.
fn draw_favorites(
    frame: &mut Frame,
    area: Rect,
    favorites: &FavoritesSet,
    state: &mut TuiState,
    palette: &Palette,
) {
    if favorites.is_empty() {
        draw_message(
            frame,
            area,
            &[
                "No favorites yet",
                "Search for a movie and press Space to add it here.",
            ],
            palette,
        );
        return;
    }
    let table = movie_table(favorites.as_slice(), favorites, " Favorites ", palette);
    frame.render_stateful_widget(table, area, &mut state.favorites_table);
}

/// Builds a movie table (favorite marker, title, year, type, id).
fn movie_table<'a>(
    movies: &'a [MovieSummary],
    favorites: &FavoritesSet,
    title: &'a str,
    palette: &Palette,
) -> Table<'a> {
    let header = Row::new(vec!["", "Title", "Year", "Type", "IMDb ID"])
        .style(palette.header())
        .bottom_margin(1);

    let rows: Vec<Row> = movies
        .iter()
        .map(|m| {
            let marker = if favorites.contains(&m.imdb_id) {
                Span::styled("\u{2665}", Style::default().fg(palette.favorite))
            } else {
                Span::raw(" ")
            };
            Row::new(vec![
                Line::from(marker),
                Line::from(m.title.as_str()),
                Line::from(m.year.as_str()),
                Line::from(m.media_type.label()),
                Line::from(m.imdb_id.as_str()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Min(20),
        Constraint::Length(11),
        Constraint::Length(8),
        Constraint::Length(11),
    ];

    Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(palette.selected())
}

/// Draws centered hint text inside a bordered block.
fn draw_message(frame: &mut Frame, area: Rect, lines: &[&str], palette: &Palette) {
    let text: Vec<Line> = lines.iter().map(|l| Line::from(*l)).collect();
    let message = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(palette.muted))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(message, area);
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, screen: Screen<'_>, state: &TuiState, palette: &Palette) {
    let help_text = if screen.pending.is_some() {
        "Esc/q: cancel request  Ctrl-C: quit"
    } else if screen.session.is_details_modal_open {
        "j/k: scroll  f: favorite  o: open IMDb  Esc/q: close"
    } else {
        match (state.input_mode, screen.session.current_view) {
            (InputMode::Editing, _) => "Type a title | Enter: search | Ctrl-U: clear | Esc: done",
            (InputMode::ConfirmClear, _) => "y: remove all favorites | any other key: cancel",
            (InputMode::Normal, View::Search) => {
                "/: search  \u{2191}\u{2193}/j/k: move  Enter: details  Space/f: favorite  Tab: favorites  t: theme  q: quit"
            }
            (InputMode::Normal, View::Favorites) => {
                "\u{2191}\u{2193}/j/k: move  Enter: details  Space/f: remove  C: clear all  Tab: search  t: theme  q: quit"
            }
        }
    };

    let footer = Paragraph::new(help_text)
        .style(Style::default().fg(palette.muted))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Draws the clear-all confirmation popup.
fn draw_confirm_clear(frame: &mut Frame, count: usize, palette: &Palette) {
    let area = centered_rect(50, 20, frame.area());
    let text = vec![
        Line::from(format!("Remove all {count} favorites?")),
        Line::from("This action cannot be undone."),
        Line::default(),
        Line::from(Span::styled("y: confirm   any other key: cancel", palette.header())),
    ];
    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(palette.base())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.error))
                .title(" Clear favorites "),
        );
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

/// Draws the details modal over the current view.
fn draw_details(frame: &mut Frame, screen: Screen<'_>, state: &TuiState, palette: &Palette) {
    let Some(movie) = &screen.session.selected_movie else {
        return;
    };
    let area = centered_rect(80, 80, frame.area());
    let lines = detail_lines(movie, screen.favorites.contains(&movie.imdb_id), palette);
    let modal = Paragraph::new(lines)
        .style(palette.base())
        .wrap(Wrap { trim: false })
        .scroll((state.detail_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(" Movie details (Esc to close) "),
        );
    frame.render_widget(Clear, area);
    frame.render_widget(modal, area);
}

/// Returns a rectangle of the given percentage size centered in `area`.
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
