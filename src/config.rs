//! Runtime configuration, read from the environment (and `.env` when present).

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CURRENCY: &str = "BRL";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub search_debounce: Duration,
    pub http_timeout: Duration,
    pub currency: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads `POS_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup("POS_API_URL") {
            let url = url.trim().trim_end_matches('/');
            if url.is_empty() { return Err(ConfigError::Empty("POS_API_URL")); }
            config.api_url = url.to_string();
        }
        if let Some(ms) = number(&lookup, "POS_SEARCH_DEBOUNCE_MS")? {
            config.search_debounce = Duration::from_millis(ms);
        }
        if let Some(secs) = number(&lookup, "POS_HTTP_TIMEOUT_SECS")? {
            config.http_timeout = Duration::from_secs(secs);
        }
        if let Some(currency) = lookup("POS_CURRENCY") {
            let currency = currency.trim().to_uppercase();
            if currency.is_empty() { return Err(ConfigError::Empty("POS_CURRENCY")); }
            config.currency = currency;
        }
        Ok(config)
    }
}

fn number(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<u64>, ConfigError> {
    lookup(key)
        .map(|raw| raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidNumber { key, value: raw }))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.search_debounce, Duration::from_millis(500));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("POS_API_URL", "http://pos.local:9000/api/"),
            ("POS_SEARCH_DEBOUNCE_MS", "250"),
            ("POS_HTTP_TIMEOUT_SECS", "3"),
            ("POS_CURRENCY", "usd"),
        ])).unwrap();
        assert_eq!(config.api_url, "http://pos.local:9000/api");
        assert_eq!(config.search_debounce, Duration::from_millis(250));
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.currency, "USD");
    }

    #[test]
    fn test_invalid_number() {
        let err = Config::from_lookup(lookup(&[("POS_SEARCH_DEBOUNCE_MS", "soon")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidNumber { key: "POS_SEARCH_DEBOUNCE_MS", value: "soon".into() });
        assert!(Config::from_lookup(lookup(&[("POS_API_URL", "  ")])).is_err());
    }
}
