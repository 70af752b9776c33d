//! Error types for the maze crate

use thiserror::Error;

/// Main error type for the maze crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid settings: {message}")]
    InvalidSettings { message: String },

    #[error("layout has no rows")]
    EmptyLayout,

    #[error("layout row {row} has {got} cells, expected {expected}")]
    RaggedLayout {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("invalid character '{character}' at row {row}, column {column} in layout")]
    InvalidLayoutCharacter {
        character: char,
        row: usize,
        column: usize,
    },

    #[error("layout needs exactly one {what}, found {found}")]
    LayoutMarkerCount { what: &'static str, found: usize },

    #[error("layout needs at least one {what}")]
    MissingLayoutFeature { what: &'static str },

    #[error("unknown algorithm '{input}'. Expected one of: monte_carlo, q_learning, actor_critic")]
    UnknownAlgorithm { input: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }

    pub(crate) fn settings(message: impl Into<String>) -> Self {
        Error::InvalidSettings {
            message: message.into(),
        }
    }
}
