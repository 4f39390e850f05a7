use thiserror::Error;

use crate::models::EntryKind;

#[derive(Debug, Error)]
pub enum MarqueeError {
    #[error("invalid catalog JSON: {0}")]
    Parse(String),

    #[error("no {kind} entry with id {id}")]
    NotFound { id: i64, kind: EntryKind },

    #[error("{patch} fields cannot be applied to a {kind} entry")]
    KindMismatch { kind: EntryKind, patch: &'static str },

    #[error("no id left to allocate: the catalog already holds id {max}")]
    IdsExhausted { max: i128 },

    #[error("source index {index} out of range (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for MarqueeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
