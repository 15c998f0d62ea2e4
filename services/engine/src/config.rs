//! services/engine/src/config.rs
//!
//! Defines the service's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use bookshare_core::EngineConfig;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
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
    pub log_level: Level,
    pub catalog_path: Option<PathBuf>,
    pub announce_interval: Duration,
    pub engine: EngineConfig,
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

    /// Builds the configuration from any variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let catalog_path = lookup("CATALOG_PATH").map(PathBuf::from);

        let interval_secs: u64 = parse_or(&lookup, "ANNOUNCE_INTERVAL_SECS", 3600)?;
        if interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "ANNOUNCE_INTERVAL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        // --- Engine tunables ---
        let defaults = EngineConfig::default();
        let daily_sample_size: usize =
            parse_or(&lookup, "DAILY_SAMPLE_SIZE", defaults.daily_sample_size)?;
        if daily_sample_size == 0 {
            return Err(ConfigError::InvalidValue(
                "DAILY_SAMPLE_SIZE".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let engine = EngineConfig {
            genre_match_bonus: parse_or(&lookup, "GENRE_MATCH_BONUS", defaults.genre_match_bonus)?,
            views_divisor: defaults.views_divisor,
            daily_sample_size,
            affinity_view_signal: parse_or(
                &lookup,
                "AFFINITY_VIEW_SIGNAL",
                defaults.affinity_view_signal,
            )?,
            priority_authors: lookup("PRIORITY_AUTHORS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|a| !a.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or(defaults.priority_authors),
        };

        Ok(Self {
            log_level,
            catalog_path,
            announce_interval: Duration::from_secs(interval_secs),
            engine,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.catalog_path, None);
        assert_eq!(config.announce_interval, Duration::from_secs(3600));
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_reads_engine_tunables() {
        let config = Config::from_lookup(lookup_from(&[
            ("DAILY_SAMPLE_SIZE", "4"),
            ("GENRE_MATCH_BONUS", "0.5"),
            ("AFFINITY_VIEW_SIGNAL", "true"),
            ("PRIORITY_AUTHORS", " Ann Leckie , ,N. K. Jemisin"),
            ("CATALOG_PATH", "seed.json"),
        ]))
        .unwrap();

        assert_eq!(config.engine.daily_sample_size, 4);
        assert_eq!(config.engine.genre_match_bonus, 0.5);
        assert!(config.engine.affinity_view_signal);
        assert_eq!(
            config.engine.priority_authors,
            vec!["Ann Leckie".to_string(), "N. K. Jemisin".to_string()]
        );
        assert_eq!(config.catalog_path, Some(PathBuf::from("seed.json")));
    }

    #[test]
    fn test_rejects_invalid_values() {
        for pairs in [
            [("RUST_LOG", "chatty")],
            [("DAILY_SAMPLE_SIZE", "0")],
            [("ANNOUNCE_INTERVAL_SECS", "soon")],
            [("AFFINITY_VIEW_SIGNAL", "maybe")],
        ] {
            let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(_, _)), "{pairs:?}");
        }
    }
}
