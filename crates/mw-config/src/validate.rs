//! Configuration validation.
//!
//! Parsing only guarantees the shape of the file. These checks guard the
//! values the engines divide or multiply by, and collect every problem so a
//! misconfigured deployment is fixed in one pass.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::Config;

/// Errors from loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("unsupported schema version: {0}")]
    SchemaError(String),

    #[error("{field}: {message}")]
    SemanticError { field: String, message: String },
}

impl ValidationError {
    fn semantic(field: &str, message: impl Into<String>) -> Self {
        ValidationError::SemanticError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<ValidationError> for mw_common::Error {
    fn from(err: ValidationError) -> Self {
        mw_common::Error::Config(err.to_string())
    }
}

/// Outcome of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Collapse into the first error, if any.
    pub fn into_result(self) -> Result<Vec<String>, ValidationError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.warnings),
        }
    }
}

/// Smallest training set the fit accepts: intercept plus two coefficients.
const MIN_TRAINING_FLOOR: usize = 3;

/// Run all semantic checks.
pub fn validate_config(config: &Config) -> ValidationResult {
    let mut result = ValidationResult::default();

    if !mw_common::schema::is_compatible(&config.schema_version) {
        result
            .errors
            .push(ValidationError::SchemaError(config.schema_version.clone()));
    }

    let analytics = &config.analytics;
    if !analytics.unit_cost.is_finite() || analytics.unit_cost < 0.0 {
        result.errors.push(ValidationError::semantic(
            "analytics.unit_cost",
            format!("must be a non-negative number, got {}", analytics.unit_cost),
        ));
    } else if analytics.unit_cost == 0.0 {
        result
            .warnings
            .push("analytics.unit_cost is 0; loss cost will always read 0".to_string());
    }

    if !analytics.safety_margin.is_finite() || analytics.safety_margin < 1.0 {
        result.errors.push(ValidationError::semantic(
            "analytics.safety_margin",
            format!("must be >= 1.0, got {}", analytics.safety_margin),
        ));
    } else if analytics.safety_margin > 2.0 {
        result.warnings.push(format!(
            "analytics.safety_margin {} recommends more than double the forecast",
            analytics.safety_margin
        ));
    }

    if analytics.min_training_records < MIN_TRAINING_FLOOR {
        result.errors.push(ValidationError::semantic(
            "analytics.min_training_records",
            format!(
                "must be at least {}, got {}",
                MIN_TRAINING_FLOOR, analytics.min_training_records
            ),
        ));
    }

    if config.store.database_path.as_os_str().is_empty() {
        result
            .errors
            .push(ValidationError::semantic("store.database_path", "must not be empty"));
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        result.errors.push(ValidationError::semantic(
            "server.bind_address",
            format!("not a socket address: {:?}", config.server.bind_address),
        ));
    }

    result
}
