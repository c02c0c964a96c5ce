//! Configuration management for Flockpost

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub accounts: AccountsConfig,
    pub scheduler: SchedulerConfig,
    pub logging: LoggingDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountsConfig {
    /// Highest indexed credential slot scanned during discovery
    pub max_slots: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between worker wake-ups
    pub tick_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingDefaults {
    pub format: String,
    pub level: String,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            max_slots: crate::credentials::MAX_ACCOUNT_SLOTS,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { tick_seconds: 60 }
    }
}

impl Default for LoggingDefaults {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            level: "info".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accounts: AccountsConfig::default(),
            scheduler: SchedulerConfig::default(),
            logging: LoggingDefaults::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file is not an error; built-in defaults apply.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.scheduler.tick_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scheduler.tick_seconds".to_string(),
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.accounts.max_slots == 0 {
            return Err(ConfigError::InvalidValue {
                field: "accounts.max_slots".to_string(),
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("FLOCKPOST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("flockpost").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.accounts.max_slots, 30);
        assert_eq!(config.scheduler.tick_seconds, 60);
        assert_eq!(config.logging.format, "text");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("[scheduler]\ntick_seconds = 5\n").unwrap();
        assert_eq!(config.scheduler.tick_seconds, 5);
        assert_eq!(config.accounts.max_slots, 30);
    }

    #[test]
    fn test_zero_tick_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scheduler]\ntick_seconds = 0").unwrap();

        let result = Config::load_from_path(file.path());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("scheduler.tick_seconds"));
    }

    #[test]
    fn test_load_from_path_reads_all_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[accounts]\nmax_slots = 5\n\n[scheduler]\ntick_seconds = 10\n\n[logging]\nformat = \"json\"\nlevel = \"debug\""
        )
        .unwrap();

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.accounts.max_slots, 5);
        assert_eq!(config.scheduler.tick_seconds, 10);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "debug");
    }
}
