//! Application state controller.
//!
//! [`App`] owns the session state, the favorites set, the API client and
//! the persistence adapter. Every user intent is a method call; failures
//! are folded into `error_message` and never returned to the caller.
#![allow(clippy::future_not_send)]

mod favorites;
mod session;

use moviefav_api::omdb::{EMPTY_ID_MESSAGE, EMPTY_QUERY_MESSAGE, LocalMovieApi, MovieSummary};
use moviefav_store::{FAVORITES_KEY, KeyValueStore, Persistence, THEME_KEY};
use tracing::instrument;

pub use favorites::{FavoriteChange, FavoritesSet};
use session::LoadingGuard;
pub use session::{SessionState, View};

/// Shown when a detail lookup fails, whatever the cause.
pub const DETAILS_ERROR_MESSAGE: &str = "Failed to fetch movie details";

/// Shown when an API call is requested without a configured key.
pub const MISSING_API_KEY_MESSAGE: &str =
    "OMDB API key is not configured. Set OMDB_API_KEY or omdb.api_key in config.toml";

/// The application state controller.
///
/// `api` is `None` when no credential is configured; searches and lookups
/// then fail validation without a network attempt.
#[derive(Debug)]
pub struct App<A, S> {
    api: Option<A>,
    persistence: Persistence<S>,
    session: SessionState,
    favorites: FavoritesSet,
}

impl<A: LocalMovieApi, S: KeyValueStore> App<A, S> {
    /// Creates the controller and rehydrates the theme flag and favorites
    /// from `store`.
    pub fn new(api: Option<A>, store: S) -> Self {
        let persistence = Persistence::new(store);
        let is_dark_mode = persistence.load::<bool>(THEME_KEY).unwrap_or(false);
        let favorites = persistence
            .load::<Vec<MovieSummary>>(FAVORITES_KEY)
            .map(FavoritesSet::from_records)
            .unwrap_or_default();

        tracing::debug!(
            is_dark_mode,
            favorites = favorites.len(),
            has_api = api.is_some(),
            "Restored application state"
        );

        Self {
            api,
            persistence,
            session: SessionState::new(is_dark_mode),
            favorites,
        }
    }

    /// Searches by title and replaces the result list.
    ///
    /// A blank term sets the validation message and leaves the results
    /// untouched. On success the view switches to [`View::Search`]; on
    /// failure the results are cleared.
    #[instrument(skip_all)]
    pub async fn request_search(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            self.session.error_message = Some(String::from(EMPTY_QUERY_MESSAGE));
            return;
        }
        let Some(api) = self.api.as_ref() else {
            self.session.error_message = Some(String::from(MISSING_API_KEY_MESSAGE));
            return;
        };

        let mut session = LoadingGuard::acquire(&mut self.session);
        session.error_message = None;
        session.search_term = String::from(term);

        match api.search(term).await {
            Ok(results) => {
                tracing::info!(term, count = results.len(), "Search completed");
                session.search_results = results;
                session.current_view = View::Search;
            }
            Err(e) => {
                tracing::warn!(term, error = %e, "Search failed");
                session.search_results.clear();
                session.error_message = Some(String::from(e.user_message()));
            }
        }
    }

    /// Fetches the full record for `imdb_id` and opens the details modal.
    ///
    /// A blank id sets the selection message without a network call. Any
    /// failure of the lookup itself shows [`DETAILS_ERROR_MESSAGE`].
    #[instrument(skip_all)]
    pub async fn request_details(&mut self, imdb_id: &str) {
        let imdb_id = imdb_id.trim();
        if imdb_id.is_empty() {
            self.session.error_message = Some(String::from(EMPTY_ID_MESSAGE));
            return;
        }
        let Some(api) = self.api.as_ref() else {
            self.session.error_message = Some(String::from(MISSING_API_KEY_MESSAGE));
            return;
        };

        let mut session = LoadingGuard::acquire(&mut self.session);
        match api.movie_details(imdb_id).await {
            Ok(detail) => {
                tracing::info!(imdb_id, title = %detail.title, "Details loaded");
                session.selected_movie = Some(detail);
                session.is_details_modal_open = true;
            }
            Err(e) => {
                tracing::warn!(imdb_id, error = %e, "Detail lookup failed");
                session.error_message = Some(String::from(DETAILS_ERROR_MESSAGE));
            }
        }
    }

    /// Adds the movie to favorites, or removes it if already saved, then
    /// persists the whole set.
    pub fn toggle_favorite(&mut self, movie: &MovieSummary) -> FavoriteChange {
        let change = self.favorites.toggle(movie);
        tracing::debug!(imdb_id = %movie.imdb_id, ?change, "Favorite toggled");
        self.persistence.save(FAVORITES_KEY, self.favorites.as_slice());
        change
    }

    /// Toggles the movie shown in the details modal.
    ///
    /// Returns `None` when no movie has been loaded.
    pub fn toggle_selected_favorite(&mut self) -> Option<FavoriteChange> {
        let summary = self.session.selected_movie.as_ref()?.summary();
        Some(self.toggle_favorite(&summary))
    }

    /// Removes every favorite, one toggle at a time. Returns how many were
    /// removed.
    pub fn clear_favorites(&mut self) -> usize {
        let snapshot = self.favorites.as_slice().to_vec();
        for movie in &snapshot {
            self.toggle_favorite(movie);
        }
        tracing::info!(removed = snapshot.len(), "Favorites cleared");
        snapshot.len()
    }

    /// Flips the theme and persists it. Returns the new `is_dark_mode`.
    pub fn toggle_theme(&mut self) -> bool {
        self.session.is_dark_mode = !self.session.is_dark_mode;
        self.persistence.save(THEME_KEY, &self.session.is_dark_mode);
        self.session.is_dark_mode
    }

    /// Changes the active view. Search results are kept.
    pub const fn switch_view(&mut self, view: View) {
        self.session.current_view = view;
    }

    /// Closes the details modal.
    pub const fn close_details(&mut self) {
        self.session.is_details_modal_open = false;
    }

    /// Clears the error banner.
    pub fn dismiss_error(&mut self) {
        self.session.error_message = None;
    }

    /// Whether `imdb_id` is saved.
    #[must_use]
    pub fn is_favorite(&self, imdb_id: &str) -> bool {
        self.favorites.contains(imdb_id)
    }

    /// Current session state.
    #[must_use]
    pub const fn session(&self) -> &SessionState {
        &self.session
    }

    /// Current favorites.
    #[must_use]
    pub const fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    /// Whether an API client is configured.
    #[must_use]
    pub const fn has_api(&self) -> bool {
        self.api.is_some()
    }

    /// Consumes the controller and returns the underlying store.
    #[cfg(test)]
    pub fn into_store(self) -> S {
        self.persistence.into_inner()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::cell::Cell;
    use std::collections::HashSet;
    use std::time::Duration;

    use moviefav_api::omdb::{MediaType, MovieApiError, MovieDetail, NETWORK_MESSAGE};
    use moviefav_store::MemoryStore;

    use super::*;

    /// In-process API double with a call counter.
    #[derive(Default)]
    struct MockApi {
        search_result: Option<Result<Vec<MovieSummary>, MovieApiError>>,
        detail_result: Option<Result<MovieDetail, MovieApiError>>,
        hang: bool,
        calls: Cell<usize>,
    }

    impl MockApi {
        fn with_search(result: Result<Vec<MovieSummary>, MovieApiError>) -> Self {
            Self {
                search_result: Some(result),
                ..Self::default()
            }
        }

        fn with_details(result: Result<MovieDetail, MovieApiError>) -> Self {
            Self {
                detail_result: Some(result),
                ..Self::default()
            }
        }

        fn hanging() -> Self {
            Self {
                hang: true,
                ..Self::default()
            }
        }

        async fn record_call(&self) {
            self.calls.set(self.calls.get() + 1);
            if self.hang {
                std::future::pending::<()>().await;
            }
        }
    }

    impl LocalMovieApi for MockApi {
        async fn search(&self, _term: &str) -> Result<Vec<MovieSummary>, MovieApiError> {
            self.record_call().await;
            self.search_result.clone().unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn movie_details(&self, _imdb_id: &str) -> Result<MovieDetail, MovieApiError> {
            self.record_call().await;
            self.detail_result
                .clone()
                .unwrap_or_else(|| Err(MovieApiError::NoResults(String::from("Incorrect IMDb ID."))))
        }
    }

    fn inception() -> MovieSummary {
        MovieSummary {
            title: String::from("Inception"),
            year: String::from("2010"),
            imdb_id: String::from("tt1375666"),
            media_type: MediaType::Movie,
            poster: None,
        }
    }

    fn movie(id: &str) -> MovieSummary {
        MovieSummary {
            title: format!("Title {id}"),
            year: String::from("2000"),
            imdb_id: String::from(id),
            media_type: MediaType::Movie,
            poster: None,
        }
    }

    fn inception_detail() -> MovieDetail {
        let json = include_str!("../../../../fixtures/omdb/detail_tt1375666.json");
        serde_json::from_str(json).unwrap()
    }

    fn make_app(api: MockApi) -> App<MockApi, MemoryStore> {
        App::new(Some(api), MemoryStore::new())
    }

    fn calls(app: &App<MockApi, MemoryStore>) -> usize {
        app.api.as_ref().unwrap().calls.get()
    }

    #[test]
    fn test_initial_state_defaults() {
        // Arrange & Act
        let app = make_app(MockApi::default());

        // Assert
        let session = app.session();
        assert!(!session.is_dark_mode);
        assert!(!session.is_loading);
        assert!(!session.is_details_modal_open);
        assert_eq!(session.current_view, View::Search);
        assert_eq!(session.error_message, None);
        assert!(app.favorites().is_empty());
    }

    #[test]
    fn test_initial_state_rehydrates_from_store() {
        // Arrange
        let store = MemoryStore::new()
            .with_value(THEME_KEY, "true")
            .with_value(
                FAVORITES_KEY,
                r#"[{"Title":"Inception","Year":"2010","imdbID":"tt1375666","Type":"movie","Poster":"N/A"}]"#,
            );

        // Act
        let app = App::new(Some(MockApi::default()), store);

        // Assert
        assert!(app.session().is_dark_mode);
        assert_eq!(app.favorites().as_slice(), &[inception()]);
        assert!(app.is_favorite("tt1375666"));
    }

    #[test]
    fn test_corrupt_persisted_data_is_treated_as_absent() {
        // Arrange
        let store = MemoryStore::new()
            .with_value(THEME_KEY, "not-a-bool")
            .with_value(FAVORITES_KEY, "{broken");

        // Act
        let app = App::new(Some(MockApi::default()), store);

        // Assert
        assert!(!app.session().is_dark_mode);
        assert!(app.favorites().is_empty());
    }

    #[test]
    fn test_duplicate_persisted_favorites_are_collapsed() {
        // Arrange
        let entry = r#"{"Title":"Inception","Year":"2010","imdbID":"tt1375666","Type":"movie","Poster":"N/A"}"#;
        let store = MemoryStore::new().with_value(FAVORITES_KEY, &format!("[{entry},{entry}]"));

        // Act
        let app = App::new(Some(MockApi::default()), store);

        // Assert
        assert_eq!(app.favorites().len(), 1);
    }

    #[tokio::test]
    async fn test_search_success_replaces_results() {
        // Arrange
        let mut app = make_app(MockApi::with_search(Ok(vec![inception()])));
        app.session.error_message = Some(String::from("previous error"));

        // Act
        app.request_search("Inception").await;

        // Assert
        let session = app.session();
        assert_eq!(session.search_results, vec![inception()]);
        assert_eq!(session.search_results.len(), 1);
        assert_eq!(session.error_message, None);
        assert_eq!(session.search_term, "Inception");
        assert!(!session.is_loading);
    }

    #[tokio::test]
    async fn test_search_success_switches_to_search_view() {
        // Arrange
        let mut app = make_app(MockApi::with_search(Ok(vec![inception()])));
        app.switch_view(View::Favorites);

        // Act
        app.request_search("Inception").await;

        // Assert
        assert_eq!(app.session().current_view, View::Search);
    }

    #[tokio::test]
    async fn test_search_not_found_shows_api_message() {
        // Arrange
        let mut app = make_app(MockApi::with_search(Err(MovieApiError::NoResults(
            String::from("Movie not found!"),
        ))));
        app.session.search_results = vec![movie("tt0000001")];

        // Act
        app.request_search("zzzznotamovie").await;

        // Assert
        let session = app.session();
        assert!(session.search_results.is_empty());
        assert_eq!(session.error_message.as_deref(), Some("Movie not found!"));
        assert!(!session.is_loading);
    }

    #[tokio::test]
    async fn test_search_network_failure_shows_generic_message() {
        // Arrange
        let mut app = make_app(MockApi::with_search(Err(MovieApiError::Network(
            String::from("connection refused"),
        ))));

        // Act
        app.request_search("Inception").await;

        // Assert
        assert!(app.session().search_results.is_empty());
        assert_eq!(app.session().error_message.as_deref(), Some(NETWORK_MESSAGE));
        assert!(!app.session().is_loading);
    }

    #[tokio::test]
    async fn test_blank_search_makes_no_call() {
        for term in ["", "   ", "\t\n"] {
            // Arrange
            let mut app = make_app(MockApi::with_search(Ok(vec![inception()])));
            app.session.search_results = vec![movie("tt0000001")];

            // Act
            app.request_search(term).await;

            // Assert
            assert_eq!(calls(&app), 0);
            assert_eq!(
                app.session().error_message.as_deref(),
                Some(EMPTY_QUERY_MESSAGE)
            );
            assert_eq!(app.session().search_results, vec![movie("tt0000001")]);
            assert!(!app.session().is_loading);
        }
    }

    #[tokio::test]
    async fn test_search_without_api_key() {
        // Arrange
        let mut app: App<MockApi, MemoryStore> = App::new(None, MemoryStore::new());

        // Act
        app.request_search("Inception").await;

        // Assert
        assert!(!app.has_api());
        assert_eq!(
            app.session().error_message.as_deref(),
            Some(MISSING_API_KEY_MESSAGE)
        );
        assert!(!app.session().is_loading);
    }

    #[tokio::test]
    async fn test_dropped_search_clears_loading() {
        // Arrange
        let mut app = make_app(MockApi::hanging());

        // Act
        let outcome =
            tokio::time::timeout(Duration::from_millis(20), app.request_search("Inception")).await;

        // Assert
        assert!(outcome.is_err());
        assert_eq!(calls(&app), 1);
        assert!(!app.session().is_loading);
    }

    #[tokio::test]
    async fn test_details_success_opens_modal() {
        // Arrange
        let mut app = make_app(MockApi::with_details(Ok(inception_detail())));

        // Act
        app.request_details("tt1375666").await;

        // Assert
        let session = app.session();
        assert!(session.is_details_modal_open);
        assert_eq!(
            session.selected_movie.as_ref().map(|m| m.imdb_id.as_str()),
            Some("tt1375666")
        );
        assert!(!session.is_loading);
    }

    #[tokio::test]
    async fn test_details_failure_keeps_modal_closed() {
        // Arrange
        let mut app = make_app(MockApi::with_details(Err(MovieApiError::NoResults(
            String::from("Incorrect IMDb ID."),
        ))));

        // Act
        app.request_details("tt0000000").await;

        // Assert
        let session = app.session();
        assert!(!session.is_details_modal_open);
        assert_eq!(session.selected_movie, None);
        assert_eq!(session.error_message.as_deref(), Some(DETAILS_ERROR_MESSAGE));
        assert!(!session.is_loading);
    }

    #[tokio::test]
    async fn test_blank_details_id_makes_no_call() {
        // Arrange
        let mut app = make_app(MockApi::with_details(Ok(inception_detail())));

        // Act
        app.request_details("  ").await;

        // Assert
        assert_eq!(calls(&app), 0);
        let session = app.session();
        assert_eq!(session.error_message.as_deref(), Some(EMPTY_ID_MESSAGE));
        assert!(!session.is_details_modal_open);
        assert!(!session.is_loading);
    }

    #[tokio::test]
    async fn test_close_details_keeps_selection() {
        // Arrange
        let mut app = make_app(MockApi::with_details(Ok(inception_detail())));
        app.request_details("tt1375666").await;

        // Act
        app.close_details();

        // Assert
        assert!(!app.session().is_details_modal_open);
        assert!(app.session().selected_movie.is_some());
    }

    #[test]
    fn test_toggle_favorite_twice_restores_length() {
        // Arrange
        let mut app = make_app(MockApi::default());
        app.toggle_favorite(&movie("tt1"));
        let before = app.favorites().len();

        // Act
        let first = app.toggle_favorite(&inception());
        let after_add = app.favorites().len();
        let second = app.toggle_favorite(&inception());

        // Assert
        assert_eq!(first, FavoriteChange::Added);
        assert_eq!(after_add, before + 1);
        assert!(!app.is_favorite("tt1375666"));
        assert_eq!(second, FavoriteChange::Removed);
        assert_eq!(app.favorites().len(), before);
    }

    #[test]
    fn test_favorites_round_trip_through_store() {
        // Arrange
        let mut app = make_app(MockApi::default());
        for id in ["tt3", "tt1", "tt2"] {
            app.toggle_favorite(&movie(id));
        }
        let saved = app.favorites().clone();

        // Act
        let reloaded = App::new(Some(MockApi::default()), app.into_store());

        // Assert
        assert_eq!(reloaded.favorites(), &saved);
    }

    #[test]
    fn test_toggle_selected_favorite() {
        // Arrange
        let mut app = make_app(MockApi::default());
        assert_eq!(app.toggle_selected_favorite(), None);
        app.session.selected_movie = Some(inception_detail());

        // Act
        let change = app.toggle_selected_favorite();

        // Assert
        assert_eq!(change, Some(FavoriteChange::Added));
        assert_eq!(app.favorites().as_slice()[0].imdb_id, "tt1375666");
    }

    #[test]
    fn test_clear_favorites_is_persisted() {
        // Arrange
        let mut app = make_app(MockApi::default());
        for id in ["tt1", "tt2", "tt3"] {
            app.toggle_favorite(&movie(id));
        }

        // Act
        let removed = app.clear_favorites();

        // Assert
        assert_eq!(removed, 3);
        assert!(app.favorites().is_empty());
        let reloaded = App::new(Some(MockApi::default()), app.into_store());
        assert!(reloaded.favorites().is_empty());
    }

    #[test]
    fn test_no_duplicate_ids_after_toggles() {
        // Arrange
        let mut app = make_app(MockApi::default());

        // Act
        for id in ["a", "b", "a", "a", "c", "b", "c", "c"] {
            app.toggle_favorite(&movie(id));
        }

        // Assert
        let ids: HashSet<&str> = app.favorites().iter().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(ids.len(), app.favorites().len());
    }

    #[test]
    fn test_toggle_theme_persists() {
        // Arrange
        let mut app = make_app(MockApi::default());
        assert!(!app.session().is_dark_mode);

        // Act
        let dark = app.toggle_theme();

        // Assert
        assert!(dark);
        assert!(app.session().is_dark_mode);
        let reloaded = App::new(Some(MockApi::default()), app.into_store());
        assert!(reloaded.session().is_dark_mode);
    }

    #[test]
    fn test_unavailable_store_keeps_session_working() {
        // Arrange
        let mut app = App::new(Some(MockApi::default()), MemoryStore::unavailable());

        // Act
        app.toggle_theme();
        app.toggle_favorite(&inception());

        // Assert
        assert!(app.session().is_dark_mode);
        assert!(app.is_favorite("tt1375666"));
        let reloaded = App::new(Some(MockApi::default()), app.into_store());
        assert!(!reloaded.session().is_dark_mode);
        assert!(reloaded.favorites().is_empty());
    }

    #[tokio::test]
    async fn test_switch_view_preserves_results() {
        // Arrange
        let mut app = make_app(MockApi::with_search(Ok(vec![inception()])));
        app.request_search("Inception").await;

        // Act
        app.switch_view(View::Favorites);
        app.switch_view(View::Search);

        // Assert
        assert_eq!(app.session().current_view, View::Search);
        assert_eq!(app.session().search_results, vec![inception()]);
    }
}
