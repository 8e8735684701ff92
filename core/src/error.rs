use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building, persisting or loading an index.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error on {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed index line {line}: {reason}")]
    Format { line: usize, reason: String },

    #[error("index already holds {tokens} tokens; load requires an empty index")]
    AlreadyPopulated { tokens: usize },

    #[error("token {0:?} cannot be persisted")]
    InvalidToken(String),

    #[error("document id {0:?} cannot be persisted")]
    InvalidDocumentId(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        IndexError::Format { line, reason: reason.into() }
    }

    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IndexError::File { path: path.into(), source }
    }
}
