use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, encoding or collating training pairs.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("index {index} out of bounds for dataset of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("tokenization failed: {0}")]
    Tokenization(String),

    #[error("cannot collate an empty batch")]
    EmptyBatch,

    #[error("invalid vocabulary: {0}")]
    Vocabulary(String),

    #[error("invalid config: {0}")]
    Config(String),
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
