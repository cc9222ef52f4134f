use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),

    #[error("chart data serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ReportError> for mw_common::Error {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Io { source, .. } => mw_common::Error::Io(source),
            other => mw_common::Error::Render(other.to_string()),
        }
    }
}
