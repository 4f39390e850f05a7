use thiserror::Error;

/// Errors from the TMDb API client.
#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("no TMDb API key configured (set TMDB_API_KEY or tmdb.api_key)")]
    MissingApiKey,
}
