//! Mess waste tracker configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for config.json (analytics constants, store, server)
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation that reports every issue at once
//! - Config snapshots for `config show`

pub mod config;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use config::{AnalyticsConfig, Config, ServerConfig, StoreConfig};
pub use resolve::{resolve_config, resolve_config_with_env, ConfigOverrides, ConfigSource, ResolvedConfig};
pub use snapshot::ConfigSnapshot;
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "MW_CONFIG";

/// Directory name under the platform config dir.
pub const APP_DIR_NAME: &str = "messwatch";

/// File name looked up inside [`APP_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.json";
