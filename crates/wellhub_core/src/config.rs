//! TOML configuration for storage location, logging and daily goals.
//!
//! # Responsibility
//! - Deserialize `wellhub.toml` with a default for every field.
//! - Apply `WELLHUB_*` environment overrides on top of a loaded file.
//!
//! # Invariants
//! - A loaded config always has valid goal thresholds (`0 < low < near < 1`).
//! - Goals are positive.

use crate::analytics::GoalThresholds;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DATA_DIR: &str = "WELLHUB_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "WELLHUB_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "WELLHUB_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WellhubConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub goals: GoalsConfig,
}

/// `[storage]`: where store files live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Name of the default store (file `{data_dir}/{database_name}.sqlite3`).
    #[serde(default = "default_database_name")]
    pub database_name: String,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

/// Platform data directory plus `wellhub`, or `./wellhub_data`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("wellhub"))
        .unwrap_or_else(|| PathBuf::from("./wellhub_data"))
}

fn default_database_name() -> String {
    crate::registry::collections::DEFAULT_STORE_NAME.to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database_name: default_database_name(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

/// `[logging]`: file logger setup. No `dir` means logging stays off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    crate::logging::default_log_level().to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

/// `[goals]`: daily targets for bounded-accumulation trackers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalsConfig {
    #[serde(default = "default_sodium_daily_mg")]
    pub sodium_daily_mg: f64,
    #[serde(default = "default_hydration_daily_liters")]
    pub hydration_daily_liters: f64,
    #[serde(default)]
    pub thresholds: GoalThresholds,
}

fn default_sodium_daily_mg() -> f64 {
    4000.0
}

fn default_hydration_daily_liters() -> f64 {
    2.5
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            sodium_daily_mg: default_sodium_daily_mg(),
            hydration_daily_liters: default_hydration_daily_liters(),
            thresholds: GoalThresholds::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, error: String },
    Parse { path: Option<PathBuf>, error: String },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, error } => {
                write!(f, "failed to read config file {}: {error}", path.display())
            }
            Self::Parse {
                path: Some(path),
                error,
            } => write!(f, "failed to parse config file {}: {error}", path.display()),
            Self::Parse { path: None, error } => write!(f, "failed to parse config: {error}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {}

impl WellhubConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            error: err.to_string(),
        })?;
        Self::parse(&content, Some(path))
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, None)
    }

    /// `load` followed by `WELLHUB_*` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies overrides looked up by environment variable name.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(data_dir) = lookup(ENV_DATA_DIR) {
            self.storage.data_dir = PathBuf::from(data_dir);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.logging.dir = Some(PathBuf::from(dir));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.goals
            .thresholds
            .validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if self.goals.sodium_daily_mg <= 0.0 || self.goals.hydration_daily_liters <= 0.0 {
            return Err(ConfigError::Invalid("daily goals must be positive".to_string()));
        }
        if self.storage.database_name.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.database_name is empty".to_string()));
        }
        Ok(())
    }

    fn parse(content: &str, path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse {
            path: path.map(Path::to_path_buf),
            error: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, WellhubConfig, ENV_DATA_DIR, ENV_LOG_LEVEL};
    use std::path::PathBuf;

    #[test]
    fn empty_file_uses_defaults() {
        let config = WellhubConfig::from_toml_str("").unwrap();
        assert_eq!(config.goals.sodium_daily_mg, 4000.0);
        assert_eq!(config.goals.hydration_daily_liters, 2.5);
        assert_eq!(config.goals.thresholds.near, 0.75);
        assert_eq!(config.goals.thresholds.low, 0.5);
        assert_eq!(config.storage.database_name, "wellhub");
        assert_eq!(config.storage.busy_timeout_ms, 5000);
        assert!(config.logging.dir.is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let config = WellhubConfig::from_toml_str(
            r#"
            [storage]
            data_dir = "/tmp/wellhub-test"
            database_name = "trackers"

            [goals]
            sodium_daily_mg = 6000

            [goals.thresholds]
            near = 0.8
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/wellhub-test"));
        assert_eq!(config.storage.database_name, "trackers");
        assert_eq!(config.goals.sodium_daily_mg, 6000.0);
        assert_eq!(config.goals.thresholds.near, 0.8);
        assert_eq!(config.goals.thresholds.low, 0.5);
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let err = WellhubConfig::from_toml_str(
            r#"
            [goals.thresholds]
            near = 0.4
            low = 0.6
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = WellhubConfig::from_toml_str("[storage").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: None, .. }));
    }

    #[test]
    fn overrides_replace_values() {
        let mut config = WellhubConfig::default();
        config.apply_overrides(|key| match key {
            ENV_DATA_DIR => Some("/var/lib/wellhub".to_string()),
            ENV_LOG_LEVEL => Some("warn".to_string()),
            _ => None,
        });
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/wellhub"));
        assert_eq!(config.logging.level, "warn");
        assert!(config.logging.dir.is_none());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = WellhubConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
