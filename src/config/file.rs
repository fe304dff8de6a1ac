//! Configuration file support for connection defaults.
//!
//! This module provides support for loading configuration from a TOML file
//! located at `~/.config/check-bucket-size/config.toml` (or the platform-specific
//! equivalent). Configuration file values serve as defaults that can be
//! overridden by CLI arguments.
//!
//! # Layering
//!
//! The precedence order is: **CLI argument > config file > hardcoded default**.
//!
//! Bucket, prefix and thresholds are per-check values and are only taken from
//! the command line.
//!
//! # Example config
//!
//! ```toml
//! provider = "s3"
//! timeout = 30
//!
//! [s3]
//! region = "eu-west-1"
//! endpoint = "http://localhost:9000"
//!
//! [gcs]
//! service_account = "~/.config/gcloud/monitoring-key.json"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration file structure.
///
/// All fields are `Option<T>` so we can detect which values are present in the
/// config file and apply layered configuration (CLI > config file > defaults).
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Default provider (`"s3"` or `"gs"`)
    pub provider: Option<String>,

    /// Listing timeout in seconds
    pub timeout: Option<u64>,

    /// S3 options
    #[serde(default)]
    pub s3: FileS3Config,

    /// GCS options
    #[serde(default)]
    pub gcs: FileGcsConfig,
}

/// S3 options from the configuration file.
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileS3Config {
    /// AWS region (e.g., `"eu-west-1"`)
    pub region: Option<String>,

    /// Endpoint of an S3-compatible service
    pub endpoint: Option<String>,
}

/// GCS options from the configuration file.
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileGcsConfig {
    /// Path to a service-account JSON key
    pub service_account: Option<PathBuf>,
}

/// Expand a leading `~` in a path to the user's home directory.
///
/// Paths that don't start with `~` are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

impl FileConfig {
    /// Returns the path where the configuration file is expected.
    ///
    /// The configuration file is located at `<config_dir>/check-bucket-size/config.toml`,
    /// where `<config_dir>` is the platform-specific configuration directory
    /// (e.g., `~/.config` on Linux, `%APPDATA%` on Windows).
    ///
    /// # Returns
    ///
    /// `Some(PathBuf)` with the config file path, or `None` if the config
    /// directory cannot be determined.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("check-bucket-size").join("config.toml"))
    }

    /// Load configuration from the default config file location.
    ///
    /// If the config file doesn't exist, returns a default (empty) configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> anyhow::Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`FileConfig::load`], a missing file is an error here.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains invalid TOML or unexpected fields
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file at {}: {e}", path.display())
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file at {}: {e}", path.display())
        })?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_config() {
        let config = FileConfig::default();

        assert!(config.provider.is_none());
        assert!(config.timeout.is_none());
        assert!(config.s3.region.is_none());
        assert!(config.s3.endpoint.is_none());
        assert!(config.gcs.service_account.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
provider = "gs"
timeout = 45

[s3]
region = "us-east-2"
endpoint = "http://localhost:9000"

[gcs]
service_account = "/etc/monitoring/key.json"
"#;

        let config: FileConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.provider, Some("gs".to_string()));
        assert_eq!(config.timeout, Some(45));
        assert_eq!(config.s3.region, Some("us-east-2".to_string()));
        assert_eq!(
            config.s3.endpoint,
            Some("http://localhost:9000".to_string())
        );
        assert_eq!(
            config.gcs.service_account,
            Some(PathBuf::from("/etc/monitoring/key.json"))
        );
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[s3]
region = "ap-southeast-1"
"#;

        let config: FileConfig = toml::from_str(toml_content).unwrap();

        assert!(config.provider.is_none());
        assert!(config.timeout.is_none());
        assert_eq!(config.s3.region, Some("ap-southeast-1".to_string()));
        assert!(config.s3.endpoint.is_none());
        assert!(config.gcs.service_account.is_none());
    }

    #[test]
    fn test_parse_empty_config() {
        let config: FileConfig = toml::from_str("").unwrap();

        assert!(config.provider.is_none());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_malformed_config_errors() {
        let toml_content = r#"timeout = "soon""#;
        assert!(toml::from_str::<FileConfig>(toml_content).is_err());
    }

    #[test]
    fn test_unknown_field_errors() {
        let toml_content = r#"
[s3]
bucket = "not-configurable-here"
"#;
        assert!(toml::from_str::<FileConfig>(toml_content).is_err());
    }

    #[test]
    fn test_config_path_returns_expected_suffix() {
        if let Some(p) = FileConfig::config_path() {
            assert!(p.ends_with("check-bucket-size/config.toml"));
        }
    }

    #[test]
    fn test_load_from_missing_file_errors() {
        let result = FileConfig::load_from(Path::new("/nonexistent/check-bucket-size.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_tilde_with_home() {
        let expanded = expand_tilde(Path::new("~/keys/gcs.json"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("keys/gcs.json"));
        }
    }

    #[test]
    fn test_expand_tilde_absolute_path_unchanged() {
        let path = PathBuf::from("/etc/monitoring/key.json");
        assert_eq!(expand_tilde(&path), path);
    }
}
