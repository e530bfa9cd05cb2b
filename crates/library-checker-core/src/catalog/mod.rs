//! Access to the external artist catalog.
//!
//! The matcher only ever sees [`CatalogClient`]; [`spotify::SpotifyClient`]
//! is the production implementation.

pub mod spotify;

use crate::error::Result;

/// Number of ranked search results the matcher considers per artist.
pub const SEARCH_LIMIT: usize = 5;

/// One search result for an artist name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCandidate {
    pub name: String,
    /// Link to the artist in the catalog (the Spotify URL).
    pub external_ref: String,
}

impl CatalogCandidate {
    pub fn new(name: impl Into<String>, external_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            external_ref: external_ref.into(),
        }
    }
}

/// Search capability the matcher depends on.
///
/// Implementations return candidates in the catalog's ranking order. An
/// `Err` is treated by callers as "no candidates" for that one name.
pub trait CatalogClient {
    fn search_artists(&self, name: &str) -> Result<Vec<CatalogCandidate>>;
}
