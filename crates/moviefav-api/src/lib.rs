//! API client library for moviefav.
//!
//! Provides a client for the OMDb movie search API.

/// OMDb API client.
pub mod omdb;
