//! Facility runtime configuration.
//!
//! Values resolve in order: explicit caller overrides, then `AMITY_*`
//! environment variables, then defaults.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "AMITY_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "AMITY_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "AMITY_LOG_DIR";
pub const SEED_ENV: &str = "AMITY_SEED";
const DEFAULT_DB_FILE_NAME: &str = "amity.db";

/// Configuration error with the offending variable and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.key, self.message)
    }
}

impl Error for ConfigError {}

/// Resolved settings for opening one facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityConfig {
    /// SQLite file holding rooms, people and assignments.
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// Absolute directory for rolling logs; logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
    /// Fixed seed for the random room chooser.
    pub seed: Option<u64>,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            seed: None,
        }
    }
}

impl FacilityConfig {
    /// Reads `AMITY_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.set_log_level(&level)?;
        }
        if let Some(dir) = read(LOG_DIR_ENV) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(seed) = read(SEED_ENV) {
            config.seed = Some(parse_seed(&seed)?);
        }

        Ok(config)
    }

    pub fn set_log_level(&mut self, level: &str) -> Result<(), ConfigError> {
        self.log_level = normalize_level(level).map_err(|message| ConfigError {
            key: LOG_LEVEL_ENV,
            message,
        })?;
        Ok(())
    }

    /// Facility name derived from the database file stem.
    pub fn facility_name(&self) -> String {
        self.db_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "amity".to_string())
    }
}

fn parse_seed(value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|err| ConfigError {
        key: SEED_ENV,
        message: format!("`{value}` is not an unsigned integer: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::{FacilityConfig, DB_PATH_ENV, LOG_LEVEL_ENV, SEED_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = FacilityConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, FacilityConfig::default());
        assert_eq!(config.facility_name(), "amity");
    }

    #[test]
    fn environment_values_override_defaults() {
        let config = FacilityConfig::from_lookup(lookup(&[
            (DB_PATH_ENV, "/var/lib/amity/valhalla.db"),
            (LOG_LEVEL_ENV, "WARNING"),
            (SEED_ENV, " 42 "),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/var/lib/amity/valhalla.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.facility_name(), "valhalla");
    }

    #[test]
    fn invalid_values_are_rejected_with_their_key() {
        let err = FacilityConfig::from_lookup(lookup(&[(SEED_ENV, "lots")])).unwrap_err();
        assert_eq!(err.key, SEED_ENV);

        let err = FacilityConfig::from_lookup(lookup(&[(LOG_LEVEL_ENV, "loud")])).unwrap_err();
        assert_eq!(err.key, LOG_LEVEL_ENV);
    }
}
