//! Client configuration
//!
//! Defaults match the record store the attendance form was written against.
//! A YAML file may override any subset of the fields.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::services::export::ExportFormat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the record store, without the `/api` suffix
    pub api_base_url: String,
    /// Applied to both connecting and the whole request
    pub request_timeout_secs: u64,
    /// Directory export files are written into
    pub export_dir: PathBuf,
    pub export_format: ExportFormat,
    /// `tracing_subscriber::EnvFilter` directives
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 10,
            export_dir: PathBuf::from("."),
            export_format: ExportFormat::Xlsx,
            log_filter: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ClientConfig = serde_yaml::from_str(content)?;
        if config.api_base_url.trim().is_empty() {
            anyhow::bail!("api_base_url cannot be empty");
        }
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.export_format, ExportFormat::Xlsx);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ClientConfig::from_yaml("export_format: csv\nexport_dir: /tmp/exports\n").unwrap();
        assert_eq!(config.export_format, ExportFormat::Csv);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.api_base_url, "http://localhost:5000");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        assert!(ClientConfig::from_yaml("api_base_url: ''\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("client.yaml");
        fs::write(&path, "api_base_url: http://school.local:8080\nrequest_timeout_secs: 3\n").unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.api_base_url, "http://school.local:8080");
        assert_eq!(config.request_timeout_secs, 3);

        let missing = ClientConfig::load(dir.path().join("missing.yaml"));
        assert!(missing.is_err());
    }
}
