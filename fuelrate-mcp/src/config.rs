//! Server configuration from the environment

use std::time::Duration;
use thiserror::Error;
use fuelrate::DisplayOptions;
use fuelrate_currency::{ExchangeRateApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

pub const API_KEY_VAR: &str = "EXCHANGE_RATE_API_KEY";
pub const BASE_URL_VAR: &str = "EXCHANGE_RATE_BASE_URL";
pub const TIMEOUT_VAR: &str = "EXCHANGE_RATE_TIMEOUT_SECS";
pub const SIGNIFICANT_FIGURES_VAR: &str = "FUELRATE_SIGNIFICANT_FIGURES";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Clone, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
    pub display: DisplayOptions,
}

// The key stays out of logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("display", &self.display)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let timeout = match get(TIMEOUT_VAR) {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid { var: TIMEOUT_VAR, expected: "a positive number of seconds", value })
                }
            },
            None => DEFAULT_TIMEOUT,
        };

        let display = match get(SIGNIFICANT_FIGURES_VAR) {
            Some(value) => match value.parse::<u32>() {
                Ok(n) if (1..=17).contains(&n) => DisplayOptions { significant_figures: n },
                _ => {
                    return Err(ConfigError::Invalid {
                        var: SIGNIFICANT_FIGURES_VAR,
                        expected: "an integer between 1 and 17",
                        value,
                    })
                }
            },
            None => DisplayOptions::default(),
        };

        let base_url = get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid { var: BASE_URL_VAR, expected: "an http(s) URL", value: base_url });
        }

        Ok(Config {
            api_key: get(API_KEY_VAR),
            base_url,
            timeout,
            display,
        })
    }

    /// Client settings when a key is configured
    pub fn exchange_rate_api(&self) -> Option<ExchangeRateApiConfig> {
        self.api_key.as_ref().map(|key| {
            ExchangeRateApiConfig::new(key.clone())
                .with_base_url(self.base_url.clone())
                .with_timeout(self.timeout)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.display.significant_figures, 6);
        assert!(config.exchange_rate_api().is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            (API_KEY_VAR, "secret-key"),
            (BASE_URL_VAR, "http://127.0.0.1:9000/v6"),
            (TIMEOUT_VAR, "2"),
            (SIGNIFICANT_FIGURES_VAR, "4"),
        ])
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("secret-key"));
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.display.significant_figures, 4);
        assert!(config.exchange_rate_api().is_some());
    }

    #[test]
    fn test_blank_key_is_unset() {
        let config = config(&[(API_KEY_VAR, "   ")]).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_malformed_values() {
        assert!(matches!(config(&[(TIMEOUT_VAR, "soon")]), Err(ConfigError::Invalid { var: TIMEOUT_VAR, .. })));
        assert!(config(&[(TIMEOUT_VAR, "0")]).is_err());
        assert!(config(&[(SIGNIFICANT_FIGURES_VAR, "40")]).is_err());
        assert!(config(&[(BASE_URL_VAR, "ftp://rates")]).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = config(&[(API_KEY_VAR, "secret-key")]).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
