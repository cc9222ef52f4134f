//! Configuration types.
//!
//! These types match `schemas/config.default.json`. Every section is
//! optional in a user file; missing sections and fields take the defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::validate::ValidationError;

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub analytics: AnalyticsConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Constants consumed by the metrics and prediction engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Currency per unit of leftover food, used for the loss figure.
    #[serde(default = "default_unit_cost")]
    pub unit_cost: f64,

    /// Multiplier applied to the predicted consumption to get the
    /// recommended cooking quantity.
    #[serde(default = "default_safety_margin")]
    pub safety_margin: f64,

    /// Minimum number of stored records before the model is fitted.
    #[serde(default = "default_min_training_records")]
    pub min_training_records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_unit_cost() -> f64 {
    60.0
}

fn default_safety_margin() -> f64 {
    1.05
}

fn default_min_training_records() -> usize {
    10
}

fn default_database_path() -> PathBuf {
    PathBuf::from("mess_data.db")
}

fn default_bind_address() -> String {
    "127.0.0.1:5000".to_string()
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            unit_cost: default_unit_cost(),
            safety_margin: default_safety_margin(),
            min_training_records: default_min_training_records(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

impl Config {
    /// Parse configuration from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }
}

/// Embedded default config JSON for fallback.
pub(crate) const DEFAULT_CONFIG_JSON: &str = include_str!("schemas/config.default.json");

impl Default for Config {
    fn default() -> Self {
        // The JSON is embedded at compile time and covered by tests.
        Self::parse_json(DEFAULT_CONFIG_JSON).expect("Embedded default config JSON is invalid")
    }
}
