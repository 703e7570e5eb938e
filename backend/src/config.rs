//! Server configuration, optionally read from a YAML file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub bind_address: String,
    pub data_directory: PathBuf,
    /// A single origin, or `None`/`"*"` for any origin
    pub allowed_origin: Option<String>,
    pub log_filter: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            data_directory: PathBuf::from("./attendance-data"),
            allowed_origin: None,
            log_filter: "info".to_string(),
        }
    }
}

impl BackendConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load from the given path, or fall back to defaults when there is none
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Invalid bind address {}", self.bind_address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = BackendConfig::load_or_default(None).unwrap();
        assert_eq!(config.socket_addr().unwrap(), "127.0.0.1:5000".parse().unwrap());
        assert_eq!(config.data_directory, PathBuf::from("./attendance-data"));
        assert!(config.allowed_origin.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("server.yaml");
        fs::write(&path, "bind_address: 0.0.0.0:8080\nallowed_origin: http://localhost:3000\n").unwrap();

        let config = BackendConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.allowed_origin.as_deref(), Some("http://localhost:3000"));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_invalid_bind_address() {
        let config = BackendConfig {
            bind_address: "localhost".to_string(),
            ..BackendConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
