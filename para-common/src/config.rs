//! Configuration loading for para
//!
//! Resolution order for every setting is environment variable first, then
//! the TOML config file, then a built-in default. The oracle API key has an
//! additional database tier resolved in the service crate.
//!
//! Config file search order:
//! 1. Path in `PARA_CONFIG`
//! 2. `~/.config/para/para.toml`
//! 3. `./para.toml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Default database location relative to the working directory
pub const DEFAULT_DATABASE_PATH: &str = "data/para.db";

/// TOML config file contents. Every field is optional; environment
/// variables override whatever is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// SQLite database file path
    pub database_path: Option<String>,

    /// Bind address (default 127.0.0.1)
    pub bind_address: Option<String>,

    /// HTTP port (default 3000)
    pub port: Option<u16>,

    /// Shared secret for the integration boundary. When absent (and no
    /// `PARA_API_KEY` env var is set) the boundary runs unauthenticated.
    pub integration_api_key: Option<String>,

    /// Anthropic API key for the classification oracle (lowest tier;
    /// database and environment take precedence)
    pub anthropic_api_key: Option<String>,
}

impl TomlConfig {
    /// Load the config file, returning defaults when no file exists.
    pub fn load() -> Result<Self> {
        match config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load a specific config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read config failed ({}): {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse config failed ({}): {}", path.display(), e)))
    }
}

/// Locate the config file without requiring it to exist.
fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("PARA_CONFIG") {
        return Some(PathBuf::from(path));
    }
    if let Some(config_dir) = dirs::config_dir() {
        let candidate = config_dir.join("para").join("para.toml");
        if candidate.exists() {
            return Some(candidate);
        }
    }
    Some(PathBuf::from("para.toml"))
}

/// Fully resolved service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub database_path: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub integration_api_key: Option<String>,
    pub toml: TomlConfig,
}

impl ServiceConfig {
    /// Resolve the effective configuration from environment + TOML.
    pub fn resolve(toml: TomlConfig) -> Result<Self> {
        let database_path = std::env::var("PARA_DATABASE_PATH")
            .ok()
            .or_else(|| toml.database_path.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

        let bind_address = std::env::var("PARA_BIND_ADDRESS")
            .ok()
            .or_else(|| toml.bind_address.clone())
            .unwrap_or_else(|| "127.0.0.1".to_string());

        let port = match std::env::var("PARA_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| Error::Config(format!("Invalid PARA_PORT '{}': {}", raw, e)))?,
            Err(_) => toml.port.unwrap_or(DEFAULT_PORT),
        };

        let integration_api_key = std::env::var("PARA_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| toml.integration_api_key.clone());

        Ok(Self {
            database_path: PathBuf::from(database_path),
            bind_address,
            port,
            integration_api_key,
            toml,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_config_parses_all_fields() {
        let config: TomlConfig = toml::from_str(
            r#"
            database_path = "/tmp/para-test.db"
            bind_address = "0.0.0.0"
            port = 8099
            integration_api_key = "secret"
            anthropic_api_key = "sk-test"
            "#,
        )
        .unwrap();

        assert_eq!(config.database_path.as_deref(), Some("/tmp/para-test.db"));
        assert_eq!(config.bind_address.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.port, Some(8099));
        assert_eq!(config.integration_api_key.as_deref(), Some("secret"));
        assert_eq!(config.anthropic_api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_toml_config_empty_file_is_all_defaults() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert!(config.database_path.is_none());
        assert!(config.port.is_none());
    }

    #[test]
    fn test_load_from_missing_file_errors() {
        let result = TomlConfig::load_from(Path::new("/nonexistent/para.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_defaults() {
        // Scoped to keys this test does not set in the environment
        let config = ServiceConfig::resolve(TomlConfig::default()).unwrap();
        assert_eq!(config.listen_addr(), format!("{}:{}", config.bind_address, config.port));
    }
}
