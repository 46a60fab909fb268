//! Errors reported by the OMDB client.

use thiserror::Error;

/// Message used when OMDB reports a failed search without an `Error` text.
pub const DEFAULT_NO_RESULTS_MESSAGE: &str = "No movies found";

/// Shown when a search is submitted with a blank term.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a movie title to search";

/// Shown when a lookup is requested without an id.
pub const EMPTY_ID_MESSAGE: &str = "Please select a movie";

/// Shown for any transport or decoding failure.
pub const NETWORK_MESSAGE: &str = "Failed to fetch movies. Please check your internet connection.";

/// Failure of a single OMDB request.
///
/// `NoResults` carries the API's own `Error` text; `Network` covers
/// everything that prevented a well-formed answer from arriving.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MovieApiError {
    /// The search term was blank after trimming. No request was sent.
    #[error("search term is empty")]
    EmptyQuery,

    /// The lookup id was blank after trimming. No request was sent.
    #[error("movie id is empty")]
    EmptyId,

    /// OMDB answered with `"Response": "False"`.
    #[error("{0}")]
    NoResults(String),

    /// Transport failure or an undecodable response body.
    #[error("network error: {0}")]
    Network(String),
}

impl MovieApiError {
    /// Human-readable wording for the error banner.
    ///
    /// `NoResults` is shown verbatim; transport failures collapse into one
    /// generic message.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::EmptyQuery => EMPTY_QUERY_MESSAGE,
            Self::EmptyId => EMPTY_ID_MESSAGE,
            Self::NoResults(message) => message,
            Self::Network(_) => NETWORK_MESSAGE,
        }
    }
}
