use std::time::Duration;
use tracing::Level;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub directory_timeout: Duration,
    pub log_level: Level,
}

impl Config {
    /// Reads `DIRECTORY_TIMEOUT_SECS` (default 5) and `RUST_LOG` (default
    /// "WARN", so replay output stays readable).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let directory_timeout = match lookup("DIRECTORY_TIMEOUT_SECS") {
            Some(secs) => secs.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                ConfigError::InvalidValue("DIRECTORY_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            None => Duration::from_secs(5),
        };

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "WARN".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            directory_timeout,
            log_level,
        })
    }
}
