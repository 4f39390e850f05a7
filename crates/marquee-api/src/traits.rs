//! Trait definitions for remote metadata services.
//!
//! Enrichment only talks to a [`MetadataService`], so the TMDb client can
//! be swapped for an in-memory fake in tests.

use std::fmt;
use std::future::Future;

/// A movie/series metadata lookup interface.
pub trait MetadataService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch descriptive details. `Ok(None)` means the service has no
    /// resource of this type with this id.
    fn details(
        &self,
        media: MediaType,
        id: u64,
    ) -> impl Future<Output = Result<Option<MediaDetails>, Self::Error>> + Send;

    /// Fetch the videos attached to a resource.
    fn videos(
        &self,
        media: MediaType,
        id: u64,
    ) -> impl Future<Output = Result<Vec<Video>, Self::Error>> + Send;
}

/// Remote resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Path segment used by the remote API.
    pub fn as_path(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

/// Descriptive details with movie/tv naming differences already folded.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MediaDetails {
    pub title: Option<String>,
    pub overview: Option<String>,
    /// `YYYY-MM-DD` release or first air date.
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

/// A video attached to a movie or series.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Video {
    pub site: String,
    /// Category, e.g. `Trailer`, `Teaser`, `Clip`.
    pub kind: String,
    pub key: String,
}
