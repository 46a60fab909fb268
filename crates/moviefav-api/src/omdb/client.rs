//! `OmdbClient` - OMDB API client implementation.

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::LocalMovieApi;
use super::error::{DEFAULT_NO_RESULTS_MESSAGE, MovieApiError};
use super::types::{ApiStatus, MovieDetail, MovieSummary, SearchPage};

/// Default base URL for the OMDB API.
const DEFAULT_BASE_URL: &str = "http://www.omdbapi.com/";

/// Placeholder shipped in sample configuration files.
const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

/// OMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Endpoint URL; every request is a GET with query parameters.
    base_url: Url,
    /// OMDB API key sent as `apikey`.
    api_key: String,
}

/// Builder for `OmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
}

impl OmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set, blank, or still the sample placeholder.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OmdbClient> {
        let api_key = self.api_key.context("api_key is required")?;
        let api_key = api_key.trim().to_owned();
        if api_key.is_empty() || api_key == PLACEHOLDER_API_KEY {
            bail!("api_key is not configured");
        }
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(OmdbClient {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl OmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OmdbClientBuilder {
        OmdbClientBuilder::new()
    }

    /// Sends a GET request with the API key and the given query parameters.
    ///
    /// The `Response` field decides success regardless of the HTTP status.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        query: &[(&str, &str)],
    ) -> Result<T, MovieApiError> {
        let mut params: Vec<(&str, &str)> = vec![("apikey", self.api_key.as_str())];
        params.extend_from_slice(query);

        let request = self
            .http_client
            .get(self.base_url.clone())
            .query(&params)
            .build()
            .map_err(|e| MovieApiError::Network(format!("failed to build request: {e}")))?;

        tracing::debug!(url = %redact_api_key(request.url()), "OMDB API request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| MovieApiError::Network(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MovieApiError::Network(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            tracing::warn!(%status, "OMDB API returned non-success HTTP status");
        }

        let envelope: ApiStatus = serde_json::from_str(&body).map_err(|e| {
            MovieApiError::Network(format!("failed to decode JSON response (HTTP {status}): {e}"))
        })?;
        if !envelope.is_success() {
            let message = envelope
                .error
                .unwrap_or_else(|| String::from(DEFAULT_NO_RESULTS_MESSAGE));
            return Err(MovieApiError::NoResults(message));
        }

        serde_json::from_str(&body)
            .map_err(|e| MovieApiError::Network(format!("failed to decode JSON response: {e}")))
    }
}

impl LocalMovieApi for OmdbClient {
    #[instrument(skip_all)]
    async fn search(&self, term: &str) -> Result<Vec<MovieSummary>, MovieApiError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(MovieApiError::EmptyQuery);
        }

        let page: SearchPage = self.get_json(&[("s", term)]).await?;
        tracing::debug!(
            returned = page.search.len(),
            total = page.total_results.as_deref().unwrap_or("-"),
            "OMDB search completed"
        );
        Ok(page.search)
    }

    #[instrument(skip_all)]
    async fn movie_details(&self, imdb_id: &str) -> Result<MovieDetail, MovieApiError> {
        let imdb_id = imdb_id.trim();
        if imdb_id.is_empty() {
            return Err(MovieApiError::EmptyId);
        }

        self.get_json(&[("i", imdb_id)]).await
    }
}

/// Returns a copy of `url` with the `apikey` query value masked for logging.
fn redact_api_key(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apikey" {
                String::from("***")
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}
