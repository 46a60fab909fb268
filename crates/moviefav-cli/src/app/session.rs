//! In-memory session state and the loading guard.

use std::ops::{Deref, DerefMut};

use moviefav_api::omdb::{MovieDetail, MovieSummary};

/// Top-level view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Search bar and results.
    #[default]
    Search,
    /// Saved favorites.
    Favorites,
}

impl View {
    /// Returns the other view.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Search => Self::Favorites,
            Self::Favorites => Self::Search,
        }
    }
}

/// Everything the views render, apart from the favorites set.
///
/// Only `is_dark_mode` survives a restart (via persistence); the rest
/// starts empty on every launch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Results of the last successful search.
    pub search_results: Vec<MovieSummary>,
    /// Term of the last submitted search.
    pub search_term: String,
    /// Record shown by the details modal.
    pub selected_movie: Option<MovieDetail>,
    /// Whether the details modal is shown.
    pub is_details_modal_open: bool,
    /// Whether an API call is in flight.
    pub is_loading: bool,
    /// Human-readable error of the last failed action.
    pub error_message: Option<String>,
    /// Active view.
    pub current_view: View,
    /// Dark palette selected.
    pub is_dark_mode: bool,
}

impl SessionState {
    /// Creates the initial state with the rehydrated theme flag.
    #[must_use]
    pub fn new(is_dark_mode: bool) -> Self {
        Self {
            is_dark_mode,
            ..Self::default()
        }
    }
}

/// Holds `is_loading` for the lifetime of one API call.
///
/// The flag is set on acquisition and cleared on drop, so it is released
/// on success, on failure, during unwinding, and when the owning future is
/// dropped before completion.
#[derive(Debug)]
pub(super) struct LoadingGuard<'a> {
    session: &'a mut SessionState,
}

impl<'a> LoadingGuard<'a> {
    /// Marks the session as loading.
    pub(super) const fn acquire(session: &'a mut SessionState) -> Self {
        session.is_loading = true;
        Self { session }
    }
}

impl Deref for LoadingGuard<'_> {
    type Target = SessionState;

    fn deref(&self) -> &SessionState {
        self.session
    }
}

impl DerefMut for LoadingGuard<'_> {
    fn deref_mut(&mut self) -> &mut SessionState {
        self.session
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.session.is_loading = false;
    }
}
