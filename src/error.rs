//! Domain errors raised while loading and summarizing the listings dataset.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the loader and the derivation pipeline.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The dataset file is missing, unreadable or does not match the schema.
    /// Fatal at startup.
    #[error("dataset unavailable at {}: {reason}", .path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    /// A derivation referenced a schema column that the loaded file did not contain.
    #[error("column '{0}' is not present in the loaded dataset")]
    ColumnMissing(&'static str),
}

impl DashboardError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DashboardError::DataUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
