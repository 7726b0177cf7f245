//! Data loading error types
//!
//! Every failure carries the path of the file it came from; there is no
//! recovery, the caller surfaces it to the user.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading the input files
#[derive(Error, Debug)]
pub enum DataError {
    /// File missing or unreadable
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV (bad quoting, wrong field count, invalid UTF-8)
    #[error("CSV error in {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the header row
    #[error("Missing column '{column}' in {path:?}")]
    MissingColumn { path: PathBuf, column: String },

    /// A date cell could not be parsed into a calendar date
    #[error("Unparseable date '{value}' in {path:?} at line {line}")]
    DateParse {
        path: PathBuf,
        line: u64,
        value: String,
    },

    /// A numeric cell could not be parsed
    #[error("Invalid number '{value}' for column '{column}' in {path:?} at line {line}")]
    InvalidNumber {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        DataError::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for data operations
pub type DataResult<T> = Result<T, DataError>;
