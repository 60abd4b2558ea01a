//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Travelog REST backend
    pub api_url: String,
    /// Directory holding persisted client state (session, recent searches)
    pub state_dir: PathBuf,
    /// Quiet period before a feed refetch trigger fires
    pub feed_debounce: Duration,
    /// Maximum age of a cached feed; `None` keeps entries until invalidated
    pub feed_cache_ttl: Option<Duration>,
    /// Per-request timeout for backend calls
    pub http_timeout: Duration,
}

const DEFAULT_API_URL: &str = "http://localhost:5050";
const DEFAULT_STATE_DIR: &str = ".travelog";
const DEFAULT_FEED_DEBOUNCE_MS: u64 = 500;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            feed_debounce: Duration::from_millis(DEFAULT_FEED_DEBOUNCE_MS),
            feed_cache_ttl: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_url = env::var("TRAVELOG_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "TRAVELOG_API_URL",
                value: api_url,
            });
        }

        let feed_cache_ttl = match env::var("FEED_CACHE_TTL_SECS") {
            Ok(raw) if !raw.trim().is_empty() => {
                Some(Duration::from_secs(parse_u64("FEED_CACHE_TTL_SECS", &raw)?))
            }
            _ => None,
        };

        Ok(Self {
            api_url,
            state_dir: env::var("TRAVELOG_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_DIR)),
            feed_debounce: Duration::from_millis(
                env::var("FEED_DEBOUNCE_MS")
                    .ok()
                    .map(|v| parse_u64("FEED_DEBOUNCE_MS", &v))
                    .transpose()?
                    .unwrap_or(DEFAULT_FEED_DEBOUNCE_MS),
            ),
            feed_cache_ttl,
            http_timeout: Duration::from_secs(
                env::var("HTTP_TIMEOUT_SECS")
                    .ok()
                    .map(|v| parse_u64("HTTP_TIMEOUT_SECS", &v))
                    .transpose()?
                    .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
        })
    }

    /// Config for tests: points at `api_url` and keeps state in `state_dir`.
    pub fn test_default(api_url: &str, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            state_dir: state_dir.into(),
            feed_debounce: Duration::from_millis(50),
            feed_cache_ttl: None,
            http_timeout: Duration::from_secs(5),
        }
    }

    /// Path of the JSON file backing persisted client storage.
    pub fn storage_path(&self) -> PathBuf {
        self.state_dir.join("storage.json")
    }
}

fn parse_u64(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("TRAVELOG_API_URL", "http://127.0.0.1:5050/");
        env::set_var("FEED_DEBOUNCE_MS", "250");
        env::set_var("FEED_CACHE_TTL_SECS", "60");
        env::remove_var("HTTP_TIMEOUT_SECS");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.api_url, "http://127.0.0.1:5050");
        assert_eq!(config.feed_debounce, Duration::from_millis(250));
        assert_eq!(config.feed_cache_ttl, Some(Duration::from_secs(60)));
        assert_eq!(config.http_timeout, Duration::from_secs(10));

        env::remove_var("TRAVELOG_API_URL");
        env::remove_var("FEED_DEBOUNCE_MS");
        env::remove_var("FEED_CACHE_TTL_SECS");
    }

    #[test]
    fn test_storage_path_under_state_dir() {
        let config = Config::test_default("http://localhost:5050", "/tmp/travelog-state");
        assert_eq!(
            config.storage_path(),
            PathBuf::from("/tmp/travelog-state/storage.json")
        );
    }
}
