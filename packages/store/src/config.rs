//! # App configuration: `dailytask.toml`
//!
//! Defines the TOML configuration file read at startup (filename:
//! [`AppConfig::filename`] = `"dailytask.toml"`). It controls where and under
//! which key names records are stored, and the minimum lengths the form
//! validators enforce.
//!
//! ## Structure
//!
//! ```toml
//! [storage]
//! key_prefix = "@tm_"                 # prefix for every stored key
//! data_dir = "/var/lib/dailytask"     # optional; platform data dir when absent
//!
//! [validation]
//! min_name_length = 2
//! min_password_length = 6
//! min_title_length = 3
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`AppConfig`] | Top-level config. Provides builder helpers, TOML (de)serialisation, file loading and the canonical filename. |
//! | [`StorageConfig`] | Storage section: `key_prefix` (default **`@tm_`**) and an optional `data_dir`. |
//! | [`ValidationConfig`] | Validation section: minimum trimmed lengths for names, passwords and task titles. |
//!
//! All structs implement `Default` so that a missing or empty config file is
//! equivalent to the default configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration stored in `dailytask.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Storage configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Prefix shared by every stored key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Directory for the file-backed store. `None` means the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_key_prefix() -> String {
    "@tm_".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            data_dir: None,
        }
    }
}

/// Minimum trimmed lengths enforced by the form validators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_min_name_length")]
    pub min_name_length: usize,
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
    #[serde(default = "default_min_title_length")]
    pub min_title_length: usize,
}

fn default_min_name_length() -> usize {
    2
}

fn default_min_password_length() -> usize {
    6
}

fn default_min_title_length() -> usize {
    3
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_name_length: default_min_name_length(),
            min_password_length: default_min_password_length(),
            min_title_length: default_min_title_length(),
        }
    }
}

impl AppConfig {
    /// Builder method to set the storage key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.storage.key_prefix = prefix.into();
        self
    }

    /// Builder method to pin the file-backed store to a directory.
    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.storage.data_dir = Some(dir);
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "dailytask.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load from a file. A missing file yields the default configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(Self::from_toml(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage.key_prefix, "@tm_");
        assert_eq!(config.validation.min_title_length, 3);
        assert_eq!(config.validation.min_name_length, 2);
        assert_eq!(config.validation.min_password_length, 6);
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml(
            r#"
            [validation]
            min_title_length = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.validation.min_title_length, 5);
        assert_eq!(config.validation.min_password_length, 6);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig::default()
            .with_key_prefix("dev_")
            .with_data_dir(PathBuf::from("/tmp/dailytask"));
        let raw = config.to_toml().unwrap();
        assert_eq!(AppConfig::from_toml(&raw).unwrap(), config);
    }

    #[test]
    fn test_load_missing_and_present_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(AppConfig::filename());

        assert_eq!(AppConfig::load(&path).unwrap(), AppConfig::default());

        std::fs::write(&path, "[storage]\nkey_prefix = \"x_\"\n").unwrap();
        assert_eq!(AppConfig::load(&path).unwrap().storage.key_prefix, "x_");

        std::fs::write(&path, "[storage\n").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
