//! Application configuration

use std::env;

use anyhow::{Context, Result};
use chrono::Duration;

use crate::domain::services::DEFAULT_ENERGY_COOLDOWN_SECS;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection URL
    pub database_url: String,

    /// HTTP server port
    pub server_port: u16,

    /// Seconds of waiting per regenerated energy point
    pub energy_cooldown_secs: i64,

    /// Seed for pattern and quest randomness; entropy when unset
    pub rng_seed: Option<u64>,

    /// JSON song catalog replacing the built-in one
    pub song_catalog_path: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite:beatclash.db?mode=rwc".to_string()),

            server_port: lookup("SERVER_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,

            energy_cooldown_secs: match lookup("ENERGY_COOLDOWN_SECS") {
                Some(value) => value
                    .parse()
                    .context("ENERGY_COOLDOWN_SECS must be a whole number of seconds")?,
                None => DEFAULT_ENERGY_COOLDOWN_SECS,
            },

            rng_seed: lookup("RNG_SEED")
                .map(|value| value.parse())
                .transpose()
                .context("RNG_SEED must be an unsigned integer")?,

            song_catalog_path: lookup("SONG_CATALOG_PATH").filter(|path| !path.is_empty()),
        })
    }

    pub fn energy_cooldown(&self) -> Duration {
        Duration::seconds(self.energy_cooldown_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, "sqlite:beatclash.db?mode=rwc");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.energy_cooldown(), Duration::minutes(5));
        assert_eq!(config.rng_seed, None);
        assert_eq!(config.song_catalog_path, None);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SERVER_PORT", "8080"),
            ("ENERGY_COOLDOWN_SECS", "60"),
            ("RNG_SEED", "1234"),
            ("SONG_CATALOG_PATH", "songs.json"),
        ])
        .unwrap();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.energy_cooldown_secs, 60);
        assert_eq!(config.rng_seed, Some(1234));
        assert_eq!(config.song_catalog_path.as_deref(), Some("songs.json"));
    }

    #[test]
    fn test_invalid_numbers_are_errors() {
        assert!(config_from(&[("SERVER_PORT", "eighty")]).is_err());
        assert!(config_from(&[("RNG_SEED", "-1")]).is_err());
        assert!(config_from(&[("ENERGY_COOLDOWN_SECS", "5m")]).is_err());
    }
}
