//! OMDb API client module.
//!
//! Handles HTTP requests to the OMDb search endpoint and
//! decodes the movie summaries it returns.

mod api;
mod client;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalOmdbApi, OmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, OmdbClient, OmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{MovieSummary, OmdbErrorResponse, OmdbSearchResponse, SearchParams};
