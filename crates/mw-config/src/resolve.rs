//! Configuration resolution.
//!
//! Lookup order: explicit `--config` path, then the `MW_CONFIG` environment
//! variable, then `<config dir>/messwatch/config.json`, then the embedded
//! defaults. An explicitly named file that does not exist falls back to the
//! defaults with a warning; a file that exists but does not parse is an
//! error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::validate::{validate_config, ValidationError};
use crate::{APP_DIR_NAME, CONFIG_ENV_VAR, CONFIG_FILE_NAME};

/// Where the active configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    Cli,
    Env,
    Xdg,
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Cli => write!(f, "cli"),
            ConfigSource::Env => write!(f, "env"),
            ConfigSource::Xdg => write!(f, "xdg"),
            ConfigSource::Defaults => write!(f, "defaults"),
        }
    }
}

/// Per-value overrides applied after the file is loaded.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database_path: Option<PathBuf>,
    pub bind_address: Option<String>,
}

/// A loaded, overridden and validated configuration.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: Config,
    pub source: ConfigSource,
    /// File the config was read from, if any.
    pub path: Option<PathBuf>,
    /// SHA-256 of the raw file contents.
    pub content_sha256: Option<String>,
    pub warnings: Vec<String>,
}

/// Resolve configuration from the process environment.
pub fn resolve_config(
    cli_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ResolvedConfig, ValidationError> {
    resolve_config_with_env(
        cli_path,
        overrides,
        |key| std::env::var(key).ok(),
        dirs::config_dir(),
    )
}

/// Resolve configuration with an injected environment and config directory.
pub fn resolve_config_with_env<F>(
    cli_path: Option<&Path>,
    overrides: &ConfigOverrides,
    env: F,
    config_dir: Option<PathBuf>,
) -> Result<ResolvedConfig, ValidationError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut warnings = Vec::new();

    let candidate = if let Some(path) = cli_path {
        Some((path.to_path_buf(), ConfigSource::Cli))
    } else if let Some(path) = env(CONFIG_ENV_VAR).filter(|p| !p.trim().is_empty()) {
        Some((PathBuf::from(path), ConfigSource::Env))
    } else {
        config_dir
            .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
            .filter(|path| path.is_file())
            .map(|path| (path, ConfigSource::Xdg))
    };

    let (mut config, source, path, content_sha256) = match candidate {
        Some((path, source)) if path.is_file() => {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let config = Config::parse_json(&content)?;
            info!(path = %path.display(), %source, "loaded configuration");
            let digest = sha256_hex(content.as_bytes());
            (config, source, Some(path), Some(digest))
        }
        Some((path, source)) => {
            let msg = format!(
                "config file {} ({}) not found, using defaults",
                path.display(),
                source
            );
            warn!("{}", msg);
            warnings.push(msg);
            (Config::default(), ConfigSource::Defaults, None, None)
        }
        None => {
            debug!("no config file found, using defaults");
            (Config::default(), ConfigSource::Defaults, None, None)
        }
    };

    if let Some(db) = &overrides.database_path {
        debug!(path = %db.display(), "database path overridden");
        config.store.database_path = db.clone();
    }
    if let Some(bind) = &overrides.bind_address {
        debug!(%bind, "bind address overridden");
        config.server.bind_address = bind.clone();
    }

    let validation = validate_config(&config);
    for err in &validation.errors {
        warn!(error = %err, "invalid configuration value");
    }
    warnings.extend(validation.into_result()?);

    Ok(ResolvedConfig {
        config,
        source,
        path,
        content_sha256,
        warnings,
    })
}

/// Compute SHA-256 hex digest.
fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_when_nothing_configured() {
        let resolved =
            resolve_config_with_env(None, &ConfigOverrides::default(), no_env, None).unwrap();
        assert_eq!(resolved.source, ConfigSource::Defaults);
        assert!(resolved.path.is_none());
        assert_eq!(resolved.config, Config::default());
    }

    #[test]
    fn cli_path_wins_over_env() {
        let dir = tempdir().unwrap();
        let cli = dir.path().join("cli.json");
        let env_file = dir.path().join("env.json");
        fs::write(
            &cli,
            r#"{"schema_version":"1.0.0","analytics":{"unit_cost":80.0}}"#,
        )
        .unwrap();
        fs::write(
            &env_file,
            r#"{"schema_version":"1.0.0","analytics":{"unit_cost":90.0}}"#,
        )
        .unwrap();

        let env_path = env_file.to_string_lossy().to_string();
        let resolved = resolve_config_with_env(
            Some(&cli),
            &ConfigOverrides::default(),
            |k| (k == CONFIG_ENV_VAR).then(|| env_path.clone()),
            None,
        )
        .unwrap();
        assert_eq!(resolved.source, ConfigSource::Cli);
        assert!((resolved.config.analytics.unit_cost - 80.0).abs() < f64::EPSILON);
        assert_eq!(resolved.content_sha256.as_ref().map(|h| h.len()), Some(64));
    }

    #[test]
    fn env_var_used_without_cli() {
        let dir = tempdir().unwrap();
        let env_file = dir.path().join("env.json");
        fs::write(
            &env_file,
            r#"{"schema_version":"1.0.0","analytics":{"min_training_records":20}}"#,
        )
        .unwrap();
        let env_path = env_file.to_string_lossy().to_string();

        let resolved = resolve_config_with_env(
            None,
            &ConfigOverrides::default(),
            |k| (k == CONFIG_ENV_VAR).then(|| env_path.clone()),
            None,
        )
        .unwrap();
        assert_eq!(resolved.source, ConfigSource::Env);
        assert_eq!(resolved.config.analytics.min_training_records, 20);
    }

    #[test]
    fn xdg_file_found() {
        let dir = tempdir().unwrap();
        let app_dir = dir.path().join(APP_DIR_NAME);
        fs::create_dir_all(&app_dir).unwrap();
        fs::write(
            app_dir.join(CONFIG_FILE_NAME),
            r#"{"schema_version":"1.0.0","server":{"bind_address":"0.0.0.0:8080"}}"#,
        )
        .unwrap();

        let resolved = resolve_config_with_env(
            None,
            &ConfigOverrides::default(),
            no_env,
            Some(dir.path().to_path_buf()),
        )
        .unwrap();
        assert_eq!(resolved.source, ConfigSource::Xdg);
        assert_eq!(resolved.config.server.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn missing_explicit_file_falls_back_with_warning() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let resolved =
            resolve_config_with_env(Some(&missing), &ConfigOverrides::default(), no_env, None)
                .unwrap();
        assert_eq!(resolved.source, ConfigSource::Defaults);
        assert_eq!(resolved.warnings.len(), 1);
    }

    #[test]
    fn malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ nope").unwrap();
        let err = resolve_config_with_env(Some(&bad), &ConfigOverrides::default(), no_env, None)
            .unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn invalid_values_are_error() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(
            &bad,
            r#"{"schema_version":"1.0.0","analytics":{"safety_margin":0.5}}"#,
        )
        .unwrap();
        let err = resolve_config_with_env(Some(&bad), &ConfigOverrides::default(), no_env, None)
            .unwrap_err();
        assert!(matches!(err, ValidationError::SemanticError { .. }));
    }

    #[test]
    fn overrides_applied() {
        let overrides = ConfigOverrides {
            database_path: Some(PathBuf::from("/tmp/other.db")),
            bind_address: Some("0.0.0.0:9000".to_string()),
        };
        let resolved = resolve_config_with_env(None, &overrides, no_env, None).unwrap();
        assert_eq!(
            resolved.config.store.database_path,
            PathBuf::from("/tmp/other.db")
        );
        assert_eq!(resolved.config.server.bind_address, "0.0.0.0:9000");
    }
}
