//! OMDb API response types and search parameters.

use serde::{Deserialize, Serialize};

// --- Search ---

/// Response from the `?s=` search endpoint.
///
/// OMDb answers both hits and misses with HTTP 200; a miss carries
/// `"Response": "False"` and no `Search` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OmdbSearchResponse {
    /// Result collection. `None` when the lookup matched nothing.
    #[serde(rename = "Search", default)]
    pub search: Option<Vec<MovieSummary>>,
    /// Total number of matches on the remote side (decimal string).
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
    /// `"True"` or `"False"`.
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    /// Error message when `response` is `"False"`.
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl OmdbSearchResponse {
    /// Returns `true` when the response carries a result collection.
    #[must_use]
    pub const fn has_results(&self) -> bool {
        self.search.is_some()
    }

    /// Parses `totalResults` into a number.
    #[must_use]
    pub fn total_results(&self) -> Option<u32> {
        self.total_results.as_deref().and_then(|s| s.parse().ok())
    }
}

/// A single movie summary, as returned by search and as persisted in favourites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Title.
    #[serde(rename = "Title", default)]
    pub title: String,
    /// Release year (may be a range such as `1992–1995` for series).
    #[serde(rename = "Year", default)]
    pub year: String,
    /// IMDb identifier (e.g. `tt0372784`).
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Poster image URL (`N/A` when missing).
    #[serde(rename = "Poster", default)]
    pub poster_url: String,
    /// `movie`, `series`, `episode` or `game`.
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl MovieSummary {
    /// Returns the poster URL, or `None` when OMDb reports `N/A`.
    #[must_use]
    pub fn poster(&self) -> Option<&str> {
        let url = self.poster_url.trim();
        if url.is_empty() || url == "N/A" {
            None
        } else {
            Some(url)
        }
    }
}

// --- Error ---

/// Error body returned by OMDb (e.g. with HTTP 401 for a bad key).
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbErrorResponse {
    /// Always `"False"`.
    #[serde(rename = "Response")]
    pub response: String,
    /// Error message.
    #[serde(rename = "Error")]
    pub error: String,
}

// --- Request parameters ---

/// Parameters for the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search term (required).
    pub query: String,
    /// Restrict to `movie`, `series` or `episode`.
    pub media_type: Option<String>,
    /// Restrict to a release year.
    pub year: Option<u32>,
}

impl SearchParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            media_type: None,
            year: None,
        }
    }

    /// Sets the type filter.
    #[must_use]
    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Sets the year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_movie_summary_uses_remote_field_names() {
        // Arrange
        let movie = MovieSummary {
            title: String::from("Alien"),
            year: String::from("1979"),
            imdb_id: String::from("tt0078748"),
            poster_url: String::from("N/A"),
            media_type: None,
        };

        // Act
        let json = serde_json::to_string(&movie).unwrap();

        // Assert
        assert_eq!(
            json,
            r#"{"Title":"Alien","Year":"1979","imdbID":"tt0078748","Poster":"N/A"}"#
        );
    }

    #[test]
    fn test_poster_na_is_none() {
        // Arrange
        let json = r#"{"Title":"X","Year":"2001","imdbID":"tt1","Poster":"N/A"}"#;

        // Act
        let movie: MovieSummary = serde_json::from_str(json).unwrap();

        // Assert
        assert!(movie.poster().is_none());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        // Arrange
        let json = r#"{"imdbID":"tt1"}"#;

        // Act
        let movie: MovieSummary = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(movie.imdb_id, "tt1");
        assert!(movie.title.is_empty());
        assert!(movie.media_type.is_none());
    }

    #[test]
    fn test_search_params_builder() {
        // Arrange & Act
        let params = SearchParams::new("alien").media_type("movie").year(1979);

        // Assert
        assert_eq!(params.query, "alien");
        assert_eq!(params.media_type.as_deref(), Some("movie"));
        assert_eq!(params.year, Some(1979));
    }

    #[test]
    fn test_total_results_parse() {
        // Arrange
        let json = r#"{"Search":[],"totalResults":"602","Response":"True"}"#;

        // Act
        let response: OmdbSearchResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert!(response.has_results());
        assert_eq!(response.total_results(), Some(602));
    }
}
