use std::path::PathBuf;

use thiserror::Error;

/// Fatal startup failures while reading the transaction file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] polars::error::PolarsError),

    /// Failure while reshaping the already-read table.
    #[error("Table error: {0}")]
    Frame(polars::error::PolarsError),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    #[error("Empty input: no rows to aggregate for '{0}'")]
    EmptyInput(String),

    #[error("Inconsistent demographics for customer {user_id}: column '{column}' differs between rows")]
    InconsistentDemographics { user_id: String, column: String },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(feature = "python")]
impl From<DashboardError> for pyo3::PyErr {
    fn from(err: DashboardError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyRuntimeError, PyValueError};
        match err {
            DashboardError::UnknownDimension(_) | DashboardError::UnknownMode(_) => {
                PyValueError::new_err(err.to_string())
            }
            other => PyRuntimeError::new_err(other.to_string()),
        }
    }
}

#[cfg(feature = "python")]
impl From<LoadError> for pyo3::PyErr {
    fn from(err: LoadError) -> pyo3::PyErr {
        DashboardError::from(err).into()
    }
}
