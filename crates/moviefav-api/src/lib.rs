//! API client library for moviefav.
//!
//! Provides the OMDB client and the movie record types it produces.

/// OMDB API client.
pub mod omdb;
