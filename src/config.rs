//! Application configuration
//!
//! Settings are read once at startup from `MITUNES_*` environment variables,
//! falling back to defaults that match the production catalog.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::model::IdentityStrategy;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.to_lowercase()).as_deref() {
            Some("release") | Some("production") => Self::Production,
            _ => Self::Development,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: Environment,
    pub base_url: String,
    pub country: String,
    pub media: String,
    /// Term searched when the store is empty on first launch
    pub default_term: String,
    /// Queries must be strictly longer than this to hit the catalog
    pub min_query_len: usize,
    pub search_debounce: Duration,
    pub retry_attempts: u32,
    pub request_timeout: Duration,
    pub store_path: PathBuf,
    pub identity: IdentityStrategy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            base_url: "https://itunes.apple.com".to_string(),
            country: "au".to_string(),
            media: "movie".to_string(),
            default_term: "star".to_string(),
            min_query_len: 3,
            search_debounce: Duration::from_millis(1000),
            retry_attempts: 3,
            request_timeout: Duration::from_secs(120),
            store_path: PathBuf::from(".cache/media.json"),
            identity: IdentityStrategy::Stable,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.environment = Environment::parse(lookup("MITUNES_ENV").as_deref());
        if let Some(url) = lookup("MITUNES_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(country) = lookup("MITUNES_COUNTRY") {
            config.country = country;
        }
        if let Some(media) = lookup("MITUNES_MEDIA") {
            config.media = media;
        }
        if let Some(term) = lookup("MITUNES_DEFAULT_TERM") {
            config.default_term = term;
        }
        if let Some(raw) = lookup("MITUNES_MIN_QUERY_LEN") {
            config.min_query_len = parse_number("MITUNES_MIN_QUERY_LEN", &raw)?;
        }
        if let Some(raw) = lookup("MITUNES_DEBOUNCE_MS") {
            config.search_debounce =
                Duration::from_millis(parse_number("MITUNES_DEBOUNCE_MS", &raw)?);
        }
        if let Some(raw) = lookup("MITUNES_RETRY_ATTEMPTS") {
            config.retry_attempts = parse_number("MITUNES_RETRY_ATTEMPTS", &raw)?;
        }
        if let Some(raw) = lookup("MITUNES_TIMEOUT_SECS") {
            config.request_timeout =
                Duration::from_secs(parse_number("MITUNES_TIMEOUT_SECS", &raw)?);
        }
        if let Some(path) = lookup("MITUNES_STORE_PATH") {
            config.store_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("MITUNES_IDENTITY") {
            config.identity = match raw.to_lowercase().as_str() {
                "stable" => IdentityStrategy::Stable,
                "fresh" => IdentityStrategy::Fresh,
                other => {
                    return Err(ConfigError::InvalidValue {
                        var: "MITUNES_IDENTITY",
                        message: format!("expected 'stable' or 'fresh', got '{}'", other),
                    });
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "MITUNES_BASE_URL",
                message: format!("'{}' is not an http(s) URL", self.base_url),
            });
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                var: "MITUNES_RETRY_ATTEMPTS",
                message: "at least one attempt is required".to_string(),
            });
        }
        Ok(())
    }

    pub fn log(&self) {
        tracing::info!(
            environment = ?self.environment,
            base_url = %self.base_url,
            country = %self.country,
            media = %self.media,
            debounce_ms = self.search_debounce.as_millis() as u64,
            retry_attempts = self.retry_attempts,
            store_path = %self.store_path.display(),
            identity = ?self.identity,
            "Configuration loaded"
        );
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        message: format!("'{}' is not a valid number", raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.default_term, "star");
        assert_eq!(config.min_query_len, 3);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.identity, IdentityStrategy::Stable);
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup(&[
            ("MITUNES_ENV", "Release"),
            ("MITUNES_BASE_URL", "http://localhost:8080/"),
            ("MITUNES_DEBOUNCE_MS", "250"),
            ("MITUNES_IDENTITY", "fresh"),
        ]))
        .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.search_debounce, Duration::from_millis(250));
        assert_eq!(config.identity, IdentityStrategy::Fresh);
    }

    #[test]
    fn bad_number_names_the_variable() {
        let err = AppConfig::from_lookup(lookup(&[("MITUNES_RETRY_ATTEMPTS", "many")])).unwrap_err();
        assert!(err.to_string().contains("MITUNES_RETRY_ATTEMPTS"));
    }

    #[test]
    fn zero_attempts_rejected() {
        assert!(AppConfig::from_lookup(lookup(&[("MITUNES_RETRY_ATTEMPTS", "0")])).is_err());
    }
}
