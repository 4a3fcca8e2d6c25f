use super::{ConfigError, FilteringConfig, LoggingConfig};
use crate::filter::FilterId;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub filtering: FilteringConfig,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub refresh_tick_secs: Option<u64>,
}

impl Config {
    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: Option<&Path>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let raw = std::fs::read_to_string(p).map_err(|source| ConfigError::Io {
                    path: p.display().to_string(),
                    source,
                })?;
                Self::from_toml(&raw)?
            }
            _ => Self::default(),
        };

        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the configuration (including assigned filter ids) back to `path`.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = self.to_toml()?;
        std::fs::write(path, raw).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(tick) = overrides.refresh_tick_secs {
            self.filtering.refresh_tick_secs = tick;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.filtering;
        if f.update_interval_hours == 0 {
            return Err(ConfigError::Validation(
                "filtering.update_interval_hours must be greater than 0".to_string(),
            ));
        }
        if f.refresh_tick_secs == 0 {
            return Err(ConfigError::Validation(
                "filtering.refresh_tick_secs must be greater than 0".to_string(),
            ));
        }
        if f.fetch_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "filtering.fetch_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if f.max_concurrent_fetches == 0 {
            return Err(ConfigError::Validation(
                "filtering.max_concurrent_fetches must be greater than 0".to_string(),
            ));
        }
        // 0 means "assign on load"; MAX leaves no room for later ids.
        if let Some(bad) = f
            .filters
            .iter()
            .find(|filter| filter.id < 0 || filter.id == FilterId::MAX)
        {
            return Err(ConfigError::Validation(format!(
                "filter {} has invalid id {}",
                bad.url, bad.id
            )));
        }
        if f.data_dir.is_empty() || f.filter_dir.is_empty() {
            return Err(ConfigError::Validation(
                "filtering.data_dir and filtering.filter_dir cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
