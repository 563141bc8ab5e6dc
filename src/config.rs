//! Service configuration.
//!
//! Two sources:
//! - `default_config()` - the TOML file embedded at compile time
//! - `load_config(path)` - a TOML file on disk, selected with `WELDOPS_CONFIG`
//!
//! `PORT` in the environment overrides `server.port` either way.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::WeldError;
use crate::jobs::{Job, JobRegistry};

/// Default configuration embedded in the binary.
/// Loaded from `config/weldops.toml`.
const DEFAULT_CONFIG: &str = include_str!("../config/weldops.toml");

pub const CONFIG_ENV: &str = "WELDOPS_CONFIG";
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    /// Jobs the registry starts with.
    #[serde(default)]
    pub jobs: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, WeldError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                WeldError::Config(format!(
                    "invalid listen address {}:{}: {}",
                    self.host, self.port, e
                ))
            })
    }
}

impl Config {
    /// Build the job registry from the seed records.
    pub fn registry(&self) -> Result<JobRegistry, WeldError> {
        JobRegistry::from_seed(self.jobs.iter().cloned().map(Job::from_map).collect())
    }

    /// Apply a `PORT` style override.
    pub fn with_port_override(mut self, port: Option<&str>) -> Result<Self> {
        if let Some(port) = port.map(str::trim).filter(|p| !p.is_empty()) {
            self.server.port = port
                .parse()
                .with_context(|| format!("{} must be a port number, got '{}'", PORT_ENV, port))?;
        }
        Ok(self)
    }
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {:?}", path))?;
    Ok(config)
}

/// The configuration embedded in the binary.
///
/// # Panics
/// Panics if the embedded TOML is invalid (a build-time bug).
pub fn default_config() -> Config {
    toml::from_str(DEFAULT_CONFIG).expect("embedded weldops.toml must be valid TOML")
}

/// Resolve configuration from the process environment.
pub fn from_env() -> Result<Config> {
    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => load_config(Path::new(path.trim()))?,
        _ => default_config(),
    };
    config.with_port_override(std::env::var(PORT_ENV).ok().as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_loads() {
        let config = default_config();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.jobs.len(), 2);
    }

    #[test]
    fn test_default_registry_has_one_active_job() {
        let registry = default_config().registry().unwrap();
        let jobs = registry.list().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id(), Some("job_001"));
        assert!(jobs[0].is_active());
        assert!(!jobs[1].is_active());
        assert_eq!(jobs[1].get("shieldingGas"), Some(&Value::from("MIX80/20")));
    }

    #[test]
    fn test_load_config_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 8080\n").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.log_level, "info");
        assert!(config.jobs.is_empty());
    }

    #[test]
    fn test_load_config_errors() {
        assert!(load_config(Path::new("/nonexistent/weldops.toml")).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_port_override() {
        let config = default_config().with_port_override(Some("10000")).unwrap();
        assert_eq!(config.server.port, 10000);

        let config = default_config().with_port_override(None).unwrap();
        assert_eq!(config.server.port, 3000);

        assert!(default_config().with_port_override(Some("http")).is_err());
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerConfig::default();
        assert_eq!(server.socket_addr().unwrap().port(), 3000);

        let bad = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(bad.socket_addr(), Err(WeldError::Config(_))));
    }
}
