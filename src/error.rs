//! Error types for loading the dataset and parsing filter selections.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading the rental dataset. All variants are fatal for the
/// process: nothing is rendered after a failed load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file '{}' not found", path.display())]
    DataSourceMissing { path: PathBuf },

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("failed to read data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl LoadError {
    pub fn is_schema_error(&self) -> bool {
        matches!(self, LoadError::Schema(_))
    }
}

/// The file exists but its contents do not match the expected layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing required column(s): {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("line {line}: cannot parse timestamp '{value}'")]
    InvalidTimestamp { line: u64, value: String },

    #[error("line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },
}

/// A selector value that names no known category.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown season '{0}'. Expected one of: All Seasons, Spring, Summer, Fall, Winter")]
    UnknownSeason(String),

    #[error(
        "unknown weather '{0}'. Expected one of: All Weather, Clear, Misty, Light Snow/Rain, Heavy Snow/Rain"
    )]
    UnknownWeather(String),
}
