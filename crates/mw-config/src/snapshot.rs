//! Point-in-time view of the active configuration, for `config show`.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::resolve::{ConfigSource, ResolvedConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub schema_version: String,
    pub source: ConfigSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_sha256: Option<String>,
    pub using_defaults: bool,
    pub captured_at: String,
    pub config: Config,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ConfigSnapshot {
    pub fn from_resolved(resolved: &ResolvedConfig) -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            source: resolved.source,
            path: resolved.path.as_ref().map(|p| p.display().to_string()),
            content_sha256: resolved.content_sha256.clone(),
            using_defaults: resolved.source == ConfigSource::Defaults,
            captured_at: chrono::Utc::now().to_rfc3339(),
            config: resolved.config.clone(),
            warnings: resolved.warnings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{resolve_config_with_env, ConfigOverrides};

    #[test]
    fn snapshot_of_defaults() {
        let resolved =
            resolve_config_with_env(None, &ConfigOverrides::default(), |_| None, None).unwrap();
        let snap = ConfigSnapshot::from_resolved(&resolved);
        assert!(snap.using_defaults);
        assert!(snap.path.is_none());

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["source"], "defaults");
        assert!(json.get("path").is_none());
        assert_eq!(json["config"]["analytics"]["min_training_records"], 10);
    }
}
