use std::path::PathBuf;
use thiserror::Error;

/// Main error type for retrieval-eval
#[derive(Error, Debug)]
pub enum EvalError {
    /// File could not be opened or read
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON-lines record is not valid JSON or has the wrong shape
    #[error("Invalid JSON in {}:{line}: {source}", path.display())]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A record lacks its required key (`id` / `query_id`)
    #[error("Missing required field `{field}` in {}:{line}", path.display())]
    MissingField {
        path: PathBuf,
        line: usize,
        field: &'static str,
    },

    /// Gold file pattern is not a valid glob
    #[error("Invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EvalError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EvalError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenient Result type using EvalError
pub type Result<T> = std::result::Result<T, EvalError>;
