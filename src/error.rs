//! Error types for XPress
//!
//! This module defines all error types used throughout the library.

use crate::record::StreamKind;
use thiserror::Error;

/// Result type alias for XPress operations
pub type Result<T> = std::result::Result<T, PrepError>;

/// Main error type for data preparation
#[derive(Error, Debug)]
pub enum PrepError {
    /// A stream has no rows after time/identifier filtering
    #[error("No data found for {stream} stream")]
    EmptyStream { stream: StreamKind },

    /// The data-access collaborator rejected the request
    #[error("Query invalid: {0}")]
    MalformedQuery(#[from] QueryError),

    /// A raw record could not be converted into a sample
    #[error("Invalid record at row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    /// Parameter file error
    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Delimited-text error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PrepError {
    /// True for the "no data found" family of failures.
    pub fn is_empty_stream(&self) -> bool {
        matches!(self, PrepError::EmptyStream { .. })
    }
}

/// Errors raised while constructing or validating a sample query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Begin is not strictly before end
    #[error("time range begins at {begin} but ends at {end}")]
    InvertedRange { begin: String, end: String },

    /// Neither a time range nor a cycle filter was given
    #[error("query has neither a time range nor a cycle filter")]
    Unbounded,

    /// A filter literal cannot be used
    #[error("invalid filter {field} = '{value}'")]
    InvalidFilter { field: &'static str, value: String },

    /// A timestamp literal does not parse
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}
