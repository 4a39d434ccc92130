//! Error types for salesboard.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for salesboard operations.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Errors that can occur while loading, aggregating or persisting sales data.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// A required column is missing from the CSV header.
    #[error("missing required column: {column}")]
    MissingColumn { column: String },

    /// An `order_date` cell could not be parsed.
    #[error("invalid order_date at line {line}: '{value}'")]
    InvalidDate { line: usize, value: String },

    /// A numeric cell is not a non-negative number.
    #[error("invalid {column} at line {line}: '{value}'")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },

    /// Neither the primary dataset nor the bundled sample exists.
    #[error("no dataset found (looked for {} and {})", primary.display(), sample.display())]
    NoDataset { primary: PathBuf, sample: PathBuf },

    /// Invalid configuration value.
    #[error("invalid configuration value: {0}")]
    Config(String),

    /// CSV reader or writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// SQLite error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
