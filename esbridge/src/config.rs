//! Client configuration
//!
//! Loaded from a TOML file:
//!
//! ```toml
//! [connection]
//! server_url = "http://localhost:9200"
//! cluster_name = "elasticsearch"
//! index = ["expenses"]
//! types = ["expense"]
//! timeout_ms = 30000
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct EsConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionConfig {
    /// Base URL of the engine, e.g. `http://localhost:9200`
    #[serde(default)]
    pub server_url: Option<String>,

    #[serde(default)]
    pub cluster_name: Option<String>,

    /// Default index scope used when an operation names none
    #[serde(default)]
    pub index: Vec<String>,

    /// Default type scope; requires an index scope
    #[serde(default)]
    pub types: Vec<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_timeout() -> u64 {
    30000
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            cluster_name: None,
            index: Vec::new(),
            types: Vec::new(),
            timeout_ms: default_timeout(),
        }
    }
}

impl ConnectionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl EsConfig {
    /// Load from a TOML file, or defaults when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(EsConfig::default());
        }
        let content = fs::read_to_string(path)?;
        let config: EsConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = EsConfig::default();
        assert!(config.connection.server_url.is_none());
        assert!(config.connection.cluster_name.is_none());
        assert_eq!(config.connection.timeout_ms, 30000);
        assert_eq!(config.connection.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp = tempdir().unwrap();
        let config = EsConfig::load_from(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config.connection.timeout_ms, 30000);
    }

    #[test]
    fn test_load_partial_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("esbridge.toml");
        fs::write(
            &path,
            r#"
[connection]
server_url = "http://es:9200"
cluster_name = "dashbuilder"
index = ["expenses", "sales"]
"#,
        )
        .unwrap();

        let config = EsConfig::load_from(&path).unwrap();
        assert_eq!(config.connection.server_url.as_deref(), Some("http://es:9200"));
        assert_eq!(config.connection.index, vec!["expenses", "sales"]);
        assert!(config.connection.types.is_empty());
        assert_eq!(config.connection.timeout_ms, 30000);
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("esbridge.toml");

        let mut config = EsConfig::default();
        config.connection.server_url = Some("http://localhost:9200".to_string());
        config.connection.timeout_ms = 5000;
        config.save(&path).unwrap();

        let loaded = EsConfig::load_from(&path).unwrap();
        assert_eq!(loaded.connection.server_url, config.connection.server_url);
        assert_eq!(loaded.connection.timeout_ms, 5000);
    }

    #[test]
    fn test_invalid_toml_is_usage_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.toml");
        fs::write(&path, "[connection\nserver_url = ").unwrap();

        let err = EsConfig::load_from(&path).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Usage);
    }
}
