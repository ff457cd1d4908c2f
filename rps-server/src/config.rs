use rps_core::RoundTimings;
use rps_persistence::connection::DEFAULT_DATABASE_URL;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
    #[error("ROUND_CLASH_MS must be shorter than ROUND_SETTLE_MS")]
    InvalidRoundTimings,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub static_dir: String,
    pub recent_games_default_limit: u64,
    pub recent_games_max_limit: u64,
    pub connection_timeout_seconds: u64,
    pub round_timings: RoundTimings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any key lookup; missing keys take their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RoundTimings::default();

        let round_timings = RoundTimings {
            clash_after: Duration::from_millis(parse_var(
                &lookup,
                "ROUND_CLASH_MS",
                defaults.clash_after.as_millis() as u64,
            )?),
            settle_after: Duration::from_millis(parse_var(
                &lookup,
                "ROUND_SETTLE_MS",
                defaults.settle_after.as_millis() as u64,
            )?),
            display_for: Duration::from_millis(parse_var(
                &lookup,
                "ROUND_DISPLAY_MS",
                defaults.display_for.as_millis() as u64,
            )?),
        };
        if round_timings.clash_after >= round_timings.settle_after {
            return Err(ConfigError::InvalidRoundTimings);
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var(&lookup, "PORT", 5000)?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "./public".to_string()),
            recent_games_default_limit: 10,
            recent_games_max_limit: parse_var(&lookup, "RECENT_GAMES_MAX_LIMIT", 100)?,
            connection_timeout_seconds: parse_var(&lookup, "CONNECTION_TIMEOUT_SECONDS", 300)?,
            round_timings,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            static_dir: "./public".to_string(),
            recent_games_default_limit: 10,
            recent_games_max_limit: 100,
            connection_timeout_seconds: 300,
            round_timings: RoundTimings::default(),
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(name) else {
        return Ok(default);
    };
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|_| ConfigError::InvalidValue { name, value })
}
