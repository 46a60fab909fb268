//! OMDB API client module.
//!
//! Handles HTTP requests to the OMDB endpoint (`s=` search and `i=` lookup)
//! and decodes the `Response`/`Error` envelope.

mod api;
mod client;
mod error;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalMovieApi, MovieApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{OmdbClient, OmdbClientBuilder};
pub use error::{
    DEFAULT_NO_RESULTS_MESSAGE, EMPTY_ID_MESSAGE, EMPTY_QUERY_MESSAGE, MovieApiError, NETWORK_MESSAGE,
};
pub use types::{MediaType, MovieDetail, MovieSummary, Rating};
