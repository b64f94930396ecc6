//! services/reader/src/config.rs
//!
//! Defines the reader's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding one JSON file per local store.
    pub data_dir: PathBuf,
    pub log_level: Level,
    /// Ends the reading session automatically after this many seconds.
    /// `None` keeps it running until Ctrl-C.
    pub session_seconds: Option<u64>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("READER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let session_seconds = match lookup("READER_SESSION_SECONDS") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue("READER_SESSION_SECONDS".to_string(), e.to_string())
            })?),
            None => None,
        };

        Ok(Self {
            data_dir,
            log_level,
            session_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.session_seconds, None);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("READER_DATA_DIR", "/tmp/reader"),
            ("RUST_LOG", "debug"),
            ("READER_SESSION_SECONDS", "90"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/reader"));
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.session_seconds, Some(90));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[("RUST_LOG", "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref name, _) if name == "RUST_LOG"));

        let err =
            Config::from_lookup(lookup_from(&[("READER_SESSION_SECONDS", "-1")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(..)));
    }
}
