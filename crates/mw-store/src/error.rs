//! Error types for store operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing records.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database file could not be opened or created
    #[error("failed to open database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Parent directory for the database could not be created
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Query or statement failure, including rows that fail to decode
    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),
}

impl From<StoreError> for mw_common::Error {
    fn from(err: StoreError) -> Self {
        mw_common::Error::Store(err.to_string())
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
