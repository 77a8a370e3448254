//! Error types for critsql.
//!
//! The rendering core never fails. Errors only come from the boundaries:
//! the criterion expression parser and the query-file loader.

use thiserror::Error;

/// The main error type for critsql operations.
#[derive(Debug, Error)]
pub enum CritError {
    /// Failed to parse a criterion expression.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Value that has no SQL literal form.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON query file error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML query file error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CritError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}

/// Result type alias for critsql operations.
pub type CritResult<T> = Result<T, CritError>;
