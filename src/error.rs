//! Error types for the sweeper crate

use thiserror::Error;

/// Main error type for the sweeper crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("controller used before initialization: {operation}")]
    NotInitialized { operation: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("cell ({x}, {y}) is out of bounds for a {width}x{height} grid")]
    CellOutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("agent {index} is out of range (population is {population})")]
    AgentOutOfRange { index: usize, population: usize },

    #[error("population changed from {expected} to {actual} since initialization")]
    PopulationMismatch { expected: usize, actual: usize },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
