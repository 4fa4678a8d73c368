//! Error types for shared report data.

use thiserror::Error;

/// Result type alias for shared data operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading or validating report inputs.
#[derive(Error, Debug)]
pub enum Error {
    /// The period ends before it starts.
    #[error("invalid report period '{label}': end {end} is before start {start}")]
    InvalidPeriod {
        label: String,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidPeriod { .. } => 20,
            Error::Json(_) => 21,
        }
    }
}
