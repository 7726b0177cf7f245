//! Dashboard error types

use crate::data::DataError;
use thiserror::Error;

/// Errors that can occur while preparing a dashboard render
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Loading one of the input tables failed
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// The selection cannot come from the sidebar widgets
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// The primary dataset has no rows, so there is nothing to select from
    #[error("Housing dataset is empty")]
    EmptyDataset,
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;
