//! # Register Configuration
//!
//! Loaded once at startup from `till.toml` plus environment overrides.
//!
//! ## Load Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppConfig::default()                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  till.toml (explicit path, or the platform config dir)                  │
//! │       │   missing file → keep defaults                                  │
//! │       ▼                                                                 │
//! │  TILL_DB_PATH / TILL_TAX_RATE_BPS / TILL_STORE_NAME                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate()                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example File
//! ```toml
//! [database]
//! path = "/var/lib/till/till.db"
//! max_connections = 5
//!
//! [store]
//! name = "Till"
//! tax_rate_bps = 1000
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StartupError;
use till_core::validation::validate_tax_rate_bps;
use till_core::{TaxRate, DEFAULT_TAX_RATE};
use till_db::DbConfig;

/// Name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "till.toml";

/// Name of the database file inside the platform data directory.
pub const DATABASE_FILE_NAME: &str = "till.db";

/// Top-level register configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub store: StoreSettings,
}

/// Where the catalog and invoices live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. `None` means the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

/// Shop-level settings printed on screen and applied at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Tax rate in basis points (1000 = 10%).
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,
}

fn default_store_name() -> String {
    "Till".to_string()
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_TAX_RATE.bps()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            tax_rate_bps: default_tax_rate_bps(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Returns
    /// * `Ok(AppConfig)` - Validated configuration
    /// * `Err(StartupError::ConfigRead | ConfigParse)` - File exists but is unusable
    /// * `Err(StartupError::InvalidConfig)` - Values out of range
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, StartupError> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, StartupError> {
        info!(?path, "Loading config from file");

        let contents = std::fs::read_to_string(path).map_err(|source| StartupError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| StartupError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), StartupError> {
        if self.database.max_connections == 0 {
            return Err(StartupError::InvalidConfig(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if let Some(path) = &self.database.path {
            if path.as_os_str().is_empty() {
                return Err(StartupError::InvalidConfig(
                    "database.path must not be empty".into(),
                ));
            }
        }

        if self.store.name.trim().is_empty() {
            return Err(StartupError::InvalidConfig(
                "store.name must not be empty".into(),
            ));
        }

        validate_tax_rate_bps(self.store.tax_rate_bps)
            .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

        Ok(())
    }

    /// Applies `TILL_*` environment variable overrides.
    fn apply_env_overrides(&mut self) -> Result<(), StartupError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key lookup (the environment, or a map in tests).
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("TILL_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(rate) = lookup("TILL_TAX_RATE_BPS") {
            let bps = rate.trim().parse::<u32>().map_err(|_| {
                StartupError::InvalidConfig(format!(
                    "TILL_TAX_RATE_BPS must be a whole number of basis points, got '{}'",
                    rate
                ))
            })?;
            debug!(tax_rate_bps = bps, "Overriding tax rate from environment");
            self.store.tax_rate_bps = bps;
        }

        if let Some(name) = lookup("TILL_STORE_NAME") {
            self.store.name = name;
        }

        Ok(())
    }

    /// Returns the default config file location.
    ///
    /// - **Linux**: `~/.config/till/till.toml`
    /// - **macOS**: `~/Library/Application Support/com.till.till/till.toml`
    /// - **Windows**: `%APPDATA%\till\till\config\till.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Resolves the database file: the configured path, else the platform data dir.
    pub fn database_path(&self) -> Result<PathBuf, StartupError> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .ok_or(StartupError::NoDataDirectory)
    }

    /// Builds the storage configuration.
    pub fn db_config(&self) -> Result<DbConfig, StartupError> {
        Ok(DbConfig::new(self.database_path()?).max_connections(self.database.max_connections))
    }

    /// Returns the configured tax rate.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.store.tax_rate_bps)
    }

    /// Returns the store name.
    pub fn store_name(&self) -> &str {
        &self.store.name
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "till", "till")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database.max_connections, 5);
        assert!(config.database.path.is_none());
        assert_eq!(config.store.name, "Till");
        assert_eq!(config.tax_rate(), DEFAULT_TAX_RATE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_field_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [store]
            tax_rate_bps = 825
            "#,
        )
        .unwrap();

        assert_eq!(config.store.tax_rate_bps, 825);
        assert_eq!(config.store.name, "Till");
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_full_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [database]
            path = "/var/lib/till/till.db"
            max_connections = 2

            [store]
            name = "Corner Shop"
            tax_rate_bps = 1000
            "#,
        )
        .unwrap();

        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/var/lib/till/till.db")
        );
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.store_name(), "Corner Shop");
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup(&[
                ("TILL_DB_PATH", "/tmp/other.db"),
                ("TILL_TAX_RATE_BPS", "500"),
                ("TILL_STORE_NAME", "Night Shift"),
            ]))
            .unwrap();

        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/other.db")));
        assert_eq!(config.store.tax_rate_bps, 500);
        assert_eq!(config.store.name, "Night Shift");
    }

    #[test]
    fn test_bad_tax_override_is_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(lookup(&[("TILL_TAX_RATE_BPS", "ten")]));
        assert!(matches!(result, Err(StartupError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let mut config = AppConfig::default();
        config.store.tax_rate_bps = 20_000;
        assert!(matches!(
            config.validate(),
            Err(StartupError::InvalidConfig(_))
        ));

        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.store.name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = std::env::temp_dir().join(format!("till-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        std::fs::write(&path, "[store\nname = ").unwrap();

        let result = AppConfig::from_file(&path);
        assert!(matches!(result, Err(StartupError::ConfigParse { .. })));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_explicit_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("till-definitely-missing.toml");
        let config = AppConfig::load(Some(path)).unwrap();
        assert_eq!(config.database.max_connections, 5);
    }
}
