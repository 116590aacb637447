use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the data layer.
///
/// Cell-level parse failures never show up here; they become missing values.
#[derive(Error, Debug)]
pub enum DataError {
    /// The file does not exist.
    #[error("data source not found at {}", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be read or is not a valid indicator table.
    #[error("failed to load data source {}: {reason}", path.display())]
    DataSource { path: PathBuf, reason: String },

    /// An indicator name that is not part of the table's schema.
    #[error("unknown indicator '{name}'")]
    InvalidIndicator { name: String },
}

impl DataError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DataError::DataSource {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error came from reading the source file (as opposed to a bad query).
    pub fn is_data_source(&self) -> bool {
        matches!(self, DataError::NotFound { .. } | DataError::DataSource { .. })
    }
}

pub type DataResult<T> = Result<T, DataError>;
