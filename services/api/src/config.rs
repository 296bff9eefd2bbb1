use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// When set, envelopes addressed to any other application id are refused.
    pub skill_id: Option<String>,
    pub directory_timeout: Duration,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// This function will look for a `.env` file in the current directory
    /// and load the following variables:
    ///
    /// *   `BIND_ADDRESS`: The address and port to bind the server to. Defaults to "0.0.0.0:3000".
    /// *   `SKILL_ID`: (Optional) The application id of this skill.
    /// *   `DIRECTORY_TIMEOUT_SECS`: (Optional) Timeout for endpoint lookups. Defaults to 5.
    /// *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so it can be tested
    /// without touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let skill_id = lookup("SKILL_ID").filter(|id| !id.trim().is_empty());

        let directory_timeout = match lookup("DIRECTORY_TIMEOUT_SECS") {
            Some(secs) => secs
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| {
                    ConfigError::InvalidValue("DIRECTORY_TIMEOUT_SECS".to_string(), e.to_string())
                })?,
            None => Duration::from_secs(5),
        };

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            skill_id,
            directory_timeout,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.skill_id, None);
        assert_eq!(config.directory_timeout, Duration::from_secs(5));
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    fn reads_all_variables() {
        let config = Config::from_lookup(lookup(&[
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("SKILL_ID", "amzn1.ask.skill.purifier"),
            ("DIRECTORY_TIMEOUT_SECS", "2"),
            ("RUST_LOG", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.skill_id.as_deref(), Some("amzn1.ask.skill.purifier"));
        assert_eq!(config.directory_timeout, Duration::from_secs(2));
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn rejects_invalid_values() {
        for (key, value) in [
            ("BIND_ADDRESS", "not-an-address"),
            ("DIRECTORY_TIMEOUT_SECS", "soon"),
            ("RUST_LOG", "loud"),
        ] {
            let result = Config::from_lookup(lookup(&[(key, value)]));
            assert!(
                matches!(result, Err(ConfigError::InvalidValue(ref k, _)) if k == key),
                "{key}={value} should be rejected"
            );
        }
    }
}
