//! Error types for the ttt-qlearn crate

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("game already over: call reset() before stepping again")]
    GameOver,

    #[error("no legal actions available")]
    NoValidMoves,

    #[error("position {position} is out of bounds (must be 0-8)")]
    InvalidPosition { position: usize },

    #[error("invalid cell value {value} at position {position} (expected -1, 0 or 1)")]
    InvalidCellValue { value: i8, position: usize },

    #[error("invalid state key '{label}': {reason}")]
    InvalidStateKey { label: String, reason: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("historical data source '{path}' is unavailable: {source}")]
    DataSourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to {operation} '{path}': {message}")]
    Persistence {
        operation: String,
        path: String,
        message: String,
    },

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
    /// Whether this error came from reading or writing a model file.
    ///
    /// Interactive front ends use this to fall back to random play instead of
    /// aborting when no usable model is available.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Persistence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_over_message_mentions_reset() {
        assert!(Error::GameOver.to_string().contains("reset()"));
    }

    #[test]
    fn test_persistence_classification() {
        let err = Error::Persistence {
            operation: "load".to_string(),
            path: "model.msgpack".to_string(),
            message: "truncated".to_string(),
        };
        assert!(err.is_persistence());
        assert!(!Error::NoValidMoves.is_persistence());
    }
}
