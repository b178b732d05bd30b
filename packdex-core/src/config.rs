//! packdex configuration (packdex.yaml)
//!
//! Optional settings for ingestion: the default variant, a pinned manifest
//! encoding, the fetch timeout and the HTTP user agent. A missing file means
//! defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::loader::{FileByteLoader, HttpByteLoader, SchemeByteLoader, DEFAULT_HTTP_TIMEOUT};
use crate::manifest::{ManifestFormat, SerdeManifestDeserializer};

/// Config file name inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "packdex.yaml";

/// Settings file contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackdexConfig {
    /// Variant to ingest when the caller does not name one
    #[serde(default)]
    pub variant: Option<String>,

    /// Pin the manifest encoding; unset means sniffing it from the leading bytes
    #[serde(default)]
    pub manifest_format: Option<ManifestFormat>,

    /// Abort fetches that take longer than this; unset waits forever
    #[serde(default)]
    pub fetch_timeout_seconds: Option<u64>,

    /// User agent for HTTP fetches
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    concat!("packdex/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for PackdexConfig {
    fn default() -> Self {
        Self {
            variant: None,
            manifest_format: None,
            fetch_timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

impl PackdexConfig {
    /// Load from the platform config directory, or defaults if absent
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(path) => Self::load_from_path(&path),
            None => {
                tracing::debug!("No platform config directory, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Load from a specific path, or defaults if the file does not exist
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Parse config from YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(content).context("Invalid config YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a specific path, creating parent directories
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.variant.as_deref() == Some("") {
            anyhow::bail!("Variant must not be empty; omit it to ingest variant-less resources only");
        }

        if self.fetch_timeout_seconds == Some(0) {
            anyhow::bail!("fetchTimeoutSeconds must be greater than zero");
        }

        Ok(())
    }

    /// Platform config file location (e.g. `~/.config/packdex/packdex.yaml`)
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("io", "packdex", "packdex")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_seconds.map(Duration::from_secs)
    }

    pub fn byte_loader(&self) -> Result<Arc<SchemeByteLoader>> {
        let http = HttpByteLoader::new(
            self.user_agent.clone(),
            self.fetch_timeout().unwrap_or(DEFAULT_HTTP_TIMEOUT),
        )?;
        Ok(Arc::new(SchemeByteLoader::new(FileByteLoader::new(), http)))
    }

    pub fn manifest_deserializer(&self) -> Arc<SerdeManifestDeserializer> {
        Arc::new(match self.manifest_format {
            Some(format) => SerdeManifestDeserializer::with_format(format),
            None => SerdeManifestDeserializer::new(),
        })
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let config = PackdexConfig::load_from_path(&temp_dir.path().join("packdex.yaml")).unwrap();
        assert_eq!(config, PackdexConfig::default());
        assert!(config.fetch_timeout().is_none());
        assert!(config.user_agent.starts_with("packdex/"));
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
variant: hd
manifestFormat: binary
fetchTimeoutSeconds: 20
"#;
        let config = PackdexConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.variant.as_deref(), Some("hd"));
        assert_eq!(config.manifest_format, Some(ManifestFormat::Binary));
        assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(20)));
        assert_eq!(
            config.manifest_deserializer().format(),
            Some(ManifestFormat::Binary)
        );
    }

    #[test]
    fn test_rejects_empty_variant_and_zero_timeout() {
        let err = PackdexConfig::from_yaml("variant: \"\"").unwrap_err();
        assert!(err.to_string().contains("Variant"));

        let err = PackdexConfig::from_yaml("fetchTimeoutSeconds: 0").unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("packdex.yaml");

        let config = PackdexConfig {
            variant: Some("sd".to_string()),
            ..PackdexConfig::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = PackdexConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
