//! Exit codes for the mw-core CLI.
//!
//! Codes below 10 are data conditions (empty store, too few records);
//! 10 and above are failures. Scripts may rely on the numeric values.

use mw_common::Error;

/// Exit codes for mw-core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command completed
    Success = 0,

    /// Store is empty, nothing to aggregate
    NoData = 1,

    /// Too few records to train the model, or degenerate data
    InsufficientData = 2,

    /// Configuration error
    ConfigError = 10,

    /// Caller input failed validation
    ValidationError = 11,

    /// Referenced record does not exist
    NotFound = 12,

    /// Persistence failure
    StoreError = 13,

    /// I/O error
    IoError = 14,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::NoData => ExitCode::NoData,
            Error::InsufficientData { .. } | Error::DegenerateData(_) => {
                ExitCode::InsufficientData
            }
            Error::Config(_) => ExitCode::ConfigError,
            Error::Validation(_) => ExitCode::ValidationError,
            Error::RecordNotFound { .. } => ExitCode::NotFound,
            Error::Store(_) => ExitCode::StoreError,
            Error::Io(_) => ExitCode::IoError,
            Error::ModelFit(_) | Error::Json(_) | Error::Render(_) => ExitCode::InternalError,
        }
    }
}
