//! OMDB response types.
//!
//! Field names follow the OMDB JSON payload. Text fields the API may
//! report as `"N/A"` are decoded as `None`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sentinel OMDB uses for a missing value.
pub(crate) const NOT_AVAILABLE: &str = "N/A";

/// Kind of title reported by OMDB.
///
/// Serialized as the raw `Type` string, so unknown kinds survive a
/// save/load cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    /// Feature film.
    Movie,
    /// TV series.
    Series,
    /// Single episode of a series.
    Episode,
    /// Any type this client does not know about (e.g. `game`), kept
    /// verbatim.
    Other(String),
}

impl MediaType {
    /// Human-readable badge label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Movie => "Movie",
            Self::Series => "Series",
            Self::Episode => "Episode",
            Self::Other(raw) if raw.trim().is_empty() => "Other",
            Self::Other(raw) => raw,
        }
    }

    /// The `Type` string as OMDB spells it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for MediaType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for MediaType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "movie" => Self::Movie,
            "series" => Self::Series,
            "episode" => Self::Episode,
            _ => Self::Other(raw),
        }
    }
}

impl From<MediaType> for String {
    fn from(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Other(raw) => raw,
            known => Self::from(known.as_str()),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search hit (`Search[]` entry). Also the persisted favorites record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year or year range (e.g. `"2008–2013"`).
    #[serde(rename = "Year", default)]
    pub year: String,
    /// IMDb identifier (`tt...`), unique per record.
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Title kind.
    #[serde(rename = "Type", default)]
    pub media_type: MediaType,
    /// Poster URL.
    #[serde(
        rename = "Poster",
        default,
        deserialize_with = "deserialize_present",
        serialize_with = "serialize_poster"
    )]
    pub poster: Option<String>,
}

/// A single entry of the `Ratings` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rating {
    /// Rating source (e.g. `"Rotten Tomatoes"`).
    #[serde(rename = "Source")]
    pub source: String,
    /// Score as displayed by the source (e.g. `"87%"`).
    #[serde(rename = "Value")]
    pub value: String,
}

/// Full record returned by an id lookup (`i=`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovieDetail {
    /// Title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Release year.
    #[serde(rename = "Year", default)]
    pub year: String,
    /// IMDb identifier.
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Title kind.
    #[serde(rename = "Type", default)]
    pub media_type: MediaType,
    /// Poster URL.
    #[serde(rename = "Poster", default, deserialize_with = "deserialize_present")]
    pub poster: Option<String>,
    /// MPAA rating.
    #[serde(rename = "Rated", default, deserialize_with = "deserialize_present")]
    pub rated: Option<String>,
    /// Release date.
    #[serde(rename = "Released", default, deserialize_with = "deserialize_present")]
    pub released: Option<String>,
    /// Runtime (e.g. `"148 min"`).
    #[serde(rename = "Runtime", default, deserialize_with = "deserialize_present")]
    pub runtime: Option<String>,
    /// Comma-separated genres.
    #[serde(rename = "Genre", default, deserialize_with = "deserialize_present")]
    pub genre: Option<String>,
    /// Director(s).
    #[serde(rename = "Director", default, deserialize_with = "deserialize_present")]
    pub director: Option<String>,
    /// Writer(s).
    #[serde(rename = "Writer", default, deserialize_with = "deserialize_present")]
    pub writer: Option<String>,
    /// Main cast.
    #[serde(rename = "Actors", default, deserialize_with = "deserialize_present")]
    pub actors: Option<String>,
    /// Plot summary.
    #[serde(rename = "Plot", default, deserialize_with = "deserialize_present")]
    pub plot: Option<String>,
    /// Spoken languages.
    #[serde(rename = "Language", default, deserialize_with = "deserialize_present")]
    pub language: Option<String>,
    /// Production countries.
    #[serde(rename = "Country", default, deserialize_with = "deserialize_present")]
    pub country: Option<String>,
    /// Awards and nominations.
    #[serde(rename = "Awards", default, deserialize_with = "deserialize_present")]
    pub awards: Option<String>,
    /// Third-party ratings.
    #[serde(rename = "Ratings", default)]
    pub ratings: Vec<Rating>,
    /// Metascore (0-100).
    #[serde(rename = "Metascore", default, deserialize_with = "deserialize_present")]
    pub metascore: Option<String>,
    /// IMDb rating (0-10).
    #[serde(rename = "imdbRating", default, deserialize_with = "deserialize_present")]
    pub imdb_rating: Option<String>,
    /// IMDb vote count.
    #[serde(rename = "imdbVotes", default, deserialize_with = "deserialize_present")]
    pub imdb_votes: Option<String>,
    /// DVD release date.
    #[serde(rename = "DVD", default, deserialize_with = "deserialize_present")]
    pub dvd: Option<String>,
    /// Box office gross.
    #[serde(rename = "BoxOffice", default, deserialize_with = "deserialize_present")]
    pub box_office: Option<String>,
    /// Production company.
    #[serde(rename = "Production", default, deserialize_with = "deserialize_present")]
    pub production: Option<String>,
    /// Official website.
    #[serde(rename = "Website", default, deserialize_with = "deserialize_present")]
    pub website: Option<String>,
    /// Number of seasons (series only).
    #[serde(rename = "totalSeasons", default, deserialize_with = "deserialize_present")]
    pub total_seasons: Option<String>,
}

impl MovieDetail {
    /// Projects the detail record onto the summary fields.
    #[must_use]
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            title: self.title.clone(),
            year: self.year.clone(),
            imdb_id: self.imdb_id.clone(),
            media_type: self.media_type.clone(),
            poster: self.poster.clone(),
        }
    }

    /// Returns the Rotten Tomatoes score if OMDB reported one.
    #[must_use]
    pub fn rotten_tomatoes(&self) -> Option<&str> {
        self.ratings
            .iter()
            .find(|r| r.source == "Rotten Tomatoes")
            .map(|r| r.value.as_str())
    }
}

/// Envelope shared by every OMDB response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiStatus {
    /// `"True"` or `"False"`.
    #[serde(rename = "Response", default)]
    pub response: String,
    /// Failure reason when `response` is `"False"`.
    #[serde(rename = "Error", default, deserialize_with = "deserialize_present")]
    pub error: Option<String>,
}

impl ApiStatus {
    /// Whether OMDB reported success.
    pub fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

/// Successful `s=` search payload.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchPage {
    /// Matching titles (first page).
    #[serde(rename = "Search", default)]
    pub search: Vec<MovieSummary>,
    /// Total hit count as a decimal string.
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
}

/// Returns `true` unless the value is blank or consists only of `N/A` tokens.
///
/// OMDB reports some composite fields as `"N/A N/A"`.
#[must_use]
pub(crate) fn is_present(value: &str) -> bool {
    let mut tokens = value.split_whitespace().peekable();
    tokens.peek().is_some() && !tokens.all(|t| t == NOT_AVAILABLE)
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| is_present(v)))
}

#[allow(clippy::ref_option)] // signature required by serde
fn serialize_poster<S>(poster: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(poster.as_deref().unwrap_or(NOT_AVAILABLE))
}
