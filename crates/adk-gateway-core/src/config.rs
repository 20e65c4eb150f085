//! Gateway configuration.
//!
//! Values come from an optional TOML file, then environment overrides:
//! - `ADK_GATEWAY_REGISTRY` - registry document path
//! - `ADK_GATEWAY_TIMEOUT_SECS` - outbound request timeout
//! - `ADK_GATEWAY_HTTP_ADDR` - bind address for the HTTP surface

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Registry document name, resolved against the working directory.
pub const DEFAULT_REGISTRY_FILE: &str = "adk_agent_list.json";

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Registry document location.
    #[serde(default = "default_registry_path")]
    pub registry_path: PathBuf,

    /// Deadline for each outbound request. `None` waits indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Bind address for the HTTP surface. `None` serves MCP on stdio.
    #[serde(default)]
    pub http_addr: Option<String>,
}

fn default_registry_path() -> PathBuf {
    PathBuf::from(DEFAULT_REGISTRY_FILE)
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            registry_path: default_registry_path(),
            request_timeout_secs: None,
            http_addr: None,
        }
    }
}

impl GatewayConfig {
    /// Default config file path: `<config_dir>/adk-gateway/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("adk-gateway").join("config.toml"))
    }

    /// Load config from `path` (or the default path), then apply the process
    /// environment. A missing file yields defaults.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed, or if an
    /// environment override is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);
        let mut config = match path {
            Some(path) if path.exists() => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            _ => Self::default(),
        };
        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// # Errors
    /// Returns `InvalidValue` if the timeout is not a whole number of seconds.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("ADK_GATEWAY_REGISTRY") {
            self.registry_path = PathBuf::from(path);
        }
        if let Some(secs) = lookup("ADK_GATEWAY_TIMEOUT_SECS") {
            let parsed = secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "ADK_GATEWAY_TIMEOUT_SECS",
                value: secs.clone(),
            })?;
            self.request_timeout_secs = Some(parsed);
        }
        if let Some(addr) = lookup("ADK_GATEWAY_HTTP_ADDR") {
            self.http_addr = Some(addr);
        }
        Ok(())
    }

    /// Outbound request deadline.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Registry path resolved against `cwd` when relative.
    #[must_use]
    pub fn registry_path_in(&self, cwd: &Path) -> PathBuf {
        if self.registry_path.is_absolute() {
            self.registry_path.clone()
        } else {
            cwd.join(&self.registry_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.registry_path, PathBuf::from("adk_agent_list.json"));
        assert_eq!(config.request_timeout(), None);
        assert_eq!(
            config.registry_path_in(Path::new("/work")),
            PathBuf::from("/work/adk_agent_list.json")
        );
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("ADK_GATEWAY_REGISTRY", "/etc/adk/servers.json"),
            ("ADK_GATEWAY_TIMEOUT_SECS", "30"),
        ]
        .into_iter()
        .collect();

        let mut config = GatewayConfig::default();
        config
            .apply_env_with(|key| env.get(key).map(|v| (*v).to_string()))
            .unwrap();

        assert_eq!(config.registry_path, PathBuf::from("/etc/adk/servers.json"));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            config.registry_path_in(Path::new("/work")),
            PathBuf::from("/etc/adk/servers.json")
        );
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let mut config = GatewayConfig::default();
        let err = config
            .apply_env_with(|key| (key == "ADK_GATEWAY_TIMEOUT_SECS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "registry_path = \"servers.json\"\nrequest_timeout_secs = 5\n",
        )
        .unwrap();

        let config = GatewayConfig::from_file(&path).unwrap();
        assert_eq!(config.registry_path, PathBuf::from("servers.json"));
        assert_eq!(config.request_timeout_secs, Some(5));
        assert_eq!(config.http_addr, None);
    }

    #[test]
    fn test_from_file_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "request_timeout_secs = \"five\"").unwrap();
        assert!(matches!(
            GatewayConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
