//! `MovieApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::MovieApiError;
use super::types::{MovieDetail, MovieSummary};

/// Movie metadata API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(MovieApi: Send)]
pub trait LocalMovieApi {
    /// Searches titles by name.
    ///
    /// # Errors
    ///
    /// - [`MovieApiError::EmptyQuery`] if `term` is blank (no request is sent).
    /// - [`MovieApiError::NoResults`] if the API reports a failed search.
    /// - [`MovieApiError::Network`] on transport or decoding failure.
    async fn search(&self, term: &str) -> Result<Vec<MovieSummary>, MovieApiError>;

    /// Fetches the full record for an IMDb id.
    ///
    /// # Errors
    ///
    /// - [`MovieApiError::EmptyId`] if `imdb_id` is blank (no request is sent).
    /// - [`MovieApiError::NoResults`] if the API reports a failed lookup.
    /// - [`MovieApiError::Network`] on transport or decoding failure.
    async fn movie_details(&self, imdb_id: &str) -> Result<MovieDetail, MovieApiError>;
}
