//! Client configuration
//!
//! Defaults are read from the environment so that the same binary works
//! locally and in CI, where `RAPIDAPI_KEY` is injected as a secret.

use crate::error::MediumError;
use crate::Result;
use std::time::Duration;

/// Default RapidAPI host serving the Medium API
pub const DEFAULT_HOST: &str = "medium2.p.rapidapi.com";

/// Medium API client configuration
#[derive(Debug, Clone)]
pub struct MediumConfig {
    /// RapidAPI key sent as `X-RapidAPI-Key`
    pub api_key: String,
    /// API host, without scheme
    pub host: String,
    /// Requests allowed per `rate_limit_period` (0 disables limiting)
    pub rate_limit_requests: u32,
    /// Window for `rate_limit_requests`
    pub rate_limit_period: Duration,
    /// Retries for 200 responses carrying an `error` payload
    pub max_retries: u32,
    /// Pause before each retry
    pub retry_delay: Duration,
    /// Upper bound on in-flight requests for bulk fetches
    pub max_concurrency: usize,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for MediumConfig {
    fn default() -> Self {
        MediumConfig {
            api_key: std::env::var("RAPIDAPI_KEY").unwrap_or_default(),
            host: std::env::var("MEDIUM_API_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            rate_limit_requests: env_parse("MEDIUM_RATE_LIMIT_REQUESTS").unwrap_or(100),
            rate_limit_period: Duration::from_secs(
                env_parse("MEDIUM_RATE_LIMIT_PERIOD_SECS").unwrap_or(60),
            ),
            max_retries: env_parse("MEDIUM_MAX_RETRIES").unwrap_or(3),
            retry_delay: Duration::from_millis(env_parse("MEDIUM_RETRY_DELAY_MS").unwrap_or(5_000)),
            max_concurrency: env_parse("MEDIUM_MAX_CONCURRENCY").unwrap_or(100),
            timeout: Duration::from_secs(30),
        }
    }
}

impl MediumConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific API key, other values from the environment
    pub fn new(api_key: &str) -> Self {
        MediumConfig {
            api_key: api_key.to_string(),
            ..Self::default()
        }
    }

    /// Point the client at a different host
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Allow `requests` calls per `period`
    pub fn with_rate_limit(mut self, requests: u32, period: Duration) -> Self {
        self.rate_limit_requests = requests;
        self.rate_limit_period = period;
        self
    }

    /// Set retry count and delay for error payloads
    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Bound concurrent requests in bulk fetches
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Set per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reject configurations the client cannot operate with
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(MediumError::Config(
                "API key is empty; set RAPIDAPI_KEY or pass one explicitly".to_string(),
            ));
        }
        if self.host.trim().is_empty() {
            return Err(MediumError::Config("host is empty".to_string()));
        }
        if self.max_concurrency == 0 {
            return Err(MediumError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the rate limiter is active
    pub fn rate_limited(&self) -> bool {
        self.rate_limit_requests > 0 && !self.rate_limit_period.is_zero()
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new_sets_key() {
        let config = MediumConfig::new("secret-key");
        assert_eq!(config.api_key, "secret-key");
        assert!(!config.host.is_empty());
    }

    #[test]
    fn test_config_builders() {
        let config = MediumConfig::new("k")
            .with_host("localhost:8080")
            .with_rate_limit(10, Duration::from_secs(1))
            .with_retries(1, Duration::from_millis(10))
            .with_max_concurrency(4);
        assert_eq!(config.host, "localhost:8080");
        assert_eq!(config.rate_limit_requests, 10);
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.retry_delay, Duration::from_millis(10));
        assert_eq!(config.max_concurrency, 4);
        assert!(config.rate_limited());
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let config = MediumConfig::new("   ");
        assert!(matches!(config.validate(), Err(MediumError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = MediumConfig::new("k").with_max_concurrency(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_requests_disables_rate_limit() {
        let config = MediumConfig::new("k").with_rate_limit(0, Duration::from_secs(60));
        assert!(!config.rate_limited());
        let config = MediumConfig::new("k").with_rate_limit(5, Duration::ZERO);
        assert!(!config.rate_limited());
    }
}
