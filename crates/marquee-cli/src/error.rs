use thiserror::Error;

use marquee_api::enrich::EnrichError;
use marquee_api::tmdb::TmdbError;
use marquee_core::error::MarqueeError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Catalog(#[from] MarqueeError),

    #[error(transparent)]
    Tmdb(#[from] TmdbError),

    #[error(transparent)]
    Enrich(#[from] EnrichError),

    #[error("{0}")]
    Usage(String),

    #[error("aborted")]
    Aborted,

    #[error("output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
