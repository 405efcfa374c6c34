//! Provider settings: region, identity endpoint, SQL connection.

use anyhow::{Context, Result};
use frontegg::transport::DEFAULT_ENDPOINT;
use mzsql::pg::{ConnectOptions, SslMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/mzprov)
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("mzprov"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Prefix for recorded ids, e.g. `aws/us-east-1`
    #[serde(default)]
    pub region: String,

    /// Identity API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// SQL connection; SQL resources are unavailable without it
    #[serde(default)]
    pub sql: Option<SqlConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub sslmode: SslMode,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_port() -> u16 {
    6875
}

fn default_database() -> String {
    "materialize".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            region: String::new(),
            endpoint: default_endpoint(),
            sql: None,
        }
    }
}

impl ProviderConfig {
    /// Load from `path`, or from the default location.
    ///
    /// A missing default file yields the default config; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = config_dir()?.join("config.toml");
                if !default.exists() {
                    log::debug!("No config at {}, using defaults", default.display());
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl SqlConfig {
    pub fn connect_options(&self, password: Option<&str>) -> ConnectOptions {
        ConnectOptions {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: password.map(str::to_string),
            database: self.database.clone(),
            sslmode: self.sslmode,
            application_name: "mzprov".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = ProviderConfig::parse(
            r#"
region = "aws/us-east-1"

[sql]
host = "abc.us-east-1.aws.materialize.cloud"
user = "ops@example.com"
sslmode = "disable"
"#,
        )
        .unwrap();
        assert_eq!(config.region, "aws/us-east-1");
        assert_eq!(config.endpoint, "https://admin.cloud.materialize.com");
        let sql = config.sql.unwrap();
        assert_eq!(sql.port, 6875);
        assert_eq!(sql.database, "materialize");
        assert_eq!(sql.sslmode, SslMode::Disable);

        let options = sql.connect_options(Some("mzp_x"));
        assert_eq!(options.password.as_deref(), Some("mzp_x"));
        assert_eq!(options.application_name, "mzprov");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = ProviderConfig::parse("").unwrap();
        assert_eq!(config, ProviderConfig::default());
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProviderConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
