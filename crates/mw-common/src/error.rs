//! Error types for the mess waste tracker.

use thiserror::Error;

use crate::id::RecordId;

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the tracker.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    // Input errors (20-29)
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("record {id} not found")]
    RecordNotFound { id: RecordId },

    // Analytics errors (30-39)
    #[error("no records available")]
    NoData,

    #[error("need at least {required} records to train the model (have {available})")]
    InsufficientData { required: usize, available: usize },

    #[error("degenerate data: {0}")]
    DegenerateData(String),

    #[error("model fit failed: {0}")]
    ModelFit(String),

    // Storage errors (50-59)
    #[error("storage error: {0}")]
    Store(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Presentation errors (70-79)
    #[error("render failed: {0}")]
    Render(String),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::Validation(_) => 20,
            Error::RecordNotFound { .. } => 21,
            Error::NoData => 30,
            Error::InsufficientData { .. } => 31,
            Error::DegenerateData(_) => 32,
            Error::ModelFit(_) => 33,
            Error::Store(_) => 50,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::Render(_) => 70,
        }
    }

    /// Whether the caller can recover by changing its input or waiting for
    /// more data, as opposed to an environment failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::RecordNotFound { .. }
                | Error::NoData
                | Error::InsufficientData { .. }
                | Error::DegenerateData(_)
        )
    }

    /// Message suitable for showing to staff.
    ///
    /// Store and I/O failures are collapsed into a generic message; their
    /// details belong in the log, not on the page.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(msg) => msg.clone(),
            Error::RecordNotFound { .. } => "Record not found".to_string(),
            Error::NoData => "No records yet. Add a daily record to get started.".to_string(),
            Error::InsufficientData { required, .. } => {
                format!("Need at least {required} records to train model")
            }
            Error::DegenerateData(reason) => format!("Cannot compute metrics: {reason}"),
            Error::ModelFit(reason) => format!("Error making prediction: {reason}"),
            Error::Store(_) | Error::Io(_) | Error::Json(_) | Error::Render(_) => {
                "Something went wrong while processing the request".to_string()
            }
            Error::Config(msg) => format!("Configuration problem: {msg}"),
        }
    }
}
