//! YAML configuration file.
//!
//! ```yaml
//! DB_DRIVER_NAME: sqlite      # optional, sqlite is the only driver
//! DB_DSN: /var/lib/owid/owid.db
//! OWID_DATA_URL: https://covid.ourworldindata.org/data/latest/owid-covid-latest.json
//! TABLE_PREFIX: owid_         # optional
//! ```

use log::info;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::download::DEFAULT_DATA_URL;
use crate::error::{Result, SyncError};
use crate::schema::{TableNames, DEFAULT_PREFIX};

/// Looked up in the working directory when `-c` is not given
pub const DEFAULT_CONFIG_FILE: &str = "owidfetch_config.yaml";

/// Supported database drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Sqlite,
}

impl Driver {
    fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Driver::Sqlite),
            other => Err(SyncError::Config(format!(
                "unsupported database driver {:?}, only 'sqlite' is available",
                other
            ))),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Driver::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(rename = "DB_DRIVER_NAME", default)]
    db_driver_name: Option<String>,
    #[serde(rename = "DB_DSN", default)]
    db_dsn: Option<String>,
    #[serde(rename = "OWID_DATA_URL", default)]
    owid_data_url: Option<String>,
    #[serde(rename = "TABLE_PREFIX", default)]
    table_prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub driver: Driver,
    pub dsn: String,
    pub data_url: String,
    pub table_prefix: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(input: &str) -> Result<Self> {
        let raw: RawConfig = serde_yaml::from_str(input)
            .map_err(|e| SyncError::Config(format!("invalid YAML: {}", e)))?;

        let driver = match non_empty(raw.db_driver_name) {
            Some(name) => Driver::parse(&name)?,
            None => {
                info!("Database driver name not specified in the configuration file, defaulting to 'sqlite'");
                Driver::Sqlite
            }
        };

        let dsn = non_empty(raw.db_dsn)
            .ok_or_else(|| SyncError::Config("DB_DSN must be set in the configuration file".into()))?;

        let data_url = non_empty(raw.owid_data_url).ok_or_else(|| {
            SyncError::Config(format!(
                "OWID_DATA_URL must be set in the configuration file (the public dataset is {})",
                DEFAULT_DATA_URL
            ))
        })?;

        let table_prefix = raw.table_prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        TableNames::new(table_prefix.as_str()).map_err(|_| {
            SyncError::Config(format!(
                "TABLE_PREFIX {:?} may only contain lowercase letters, digits and '_', and may not start with a digit",
                table_prefix
            ))
        })?;

        Ok(Self {
            driver,
            dsn,
            data_url,
            table_prefix,
        })
    }

    pub fn table_names(&self) -> Result<TableNames> {
        TableNames::new(self.table_prefix.as_str())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::from_yaml("DB_DSN: owid.db\nOWID_DATA_URL: http://localhost/owid.json\n").unwrap();
        assert_eq!(config.driver, Driver::Sqlite);
        assert_eq!(config.dsn, "owid.db");
        assert_eq!(config.data_url, "http://localhost/owid.json");
        assert_eq!(config.table_prefix, "owid_");
        assert_eq!(config.table_names().unwrap().areas(), "owid_areas");
    }

    #[test]
    fn test_missing_required_keys() {
        let err = Config::from_yaml("OWID_DATA_URL: http://localhost/owid.json").unwrap_err();
        assert!(matches!(err, SyncError::Config(msg) if msg.contains("DB_DSN")));

        let err = Config::from_yaml("DB_DSN: owid.db\nOWID_DATA_URL: ''").unwrap_err();
        assert!(matches!(err, SyncError::Config(msg) if msg.contains("OWID_DATA_URL")));
    }

    #[test]
    fn test_unsupported_driver() {
        let err = Config::from_yaml("DB_DRIVER_NAME: mysql\nDB_DSN: x\nOWID_DATA_URL: y").unwrap_err();
        assert!(matches!(err, SyncError::Config(msg) if msg.contains("mysql")));

        let config = Config::from_yaml("DB_DRIVER_NAME: SQLite3\nDB_DSN: x\nOWID_DATA_URL: y").unwrap();
        assert_eq!(config.driver.to_string(), "sqlite");
    }

    #[test]
    fn test_table_prefix() {
        let config = Config::from_yaml("DB_DSN: x\nOWID_DATA_URL: y\nTABLE_PREFIX: ''").unwrap();
        assert_eq!(config.table_names().unwrap().locations(), "locations");

        let err = Config::from_yaml("DB_DSN: x\nOWID_DATA_URL: y\nTABLE_PREFIX: 'covid-'").unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));

        let err = Config::from_yaml("DB_DSN: x\nOWID_DATA_URL: y\nTABLE_PREFIX: '2021_'").unwrap_err();
        assert!(matches!(err, SyncError::Config(msg) if msg.contains("2021_")));
    }

    #[test]
    fn test_load_from_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "DB_DSN: /tmp/owid.db\nOWID_DATA_URL: http://example.org\n").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.dsn, "/tmp/owid.db");

        assert!(matches!(
            Config::load(Path::new("/nonexistent/owidfetch_config.yaml")),
            Err(SyncError::Io(_))
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(Config::from_yaml("DB_DSN: [unclosed"), Err(SyncError::Config(_))));
    }
}
