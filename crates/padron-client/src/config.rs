//! Registry client configuration.
//!
//! Defaults point to the public Decolecta gateway. Override via environment
//! variables or explicit construction for proxies and tests.

use std::time::Duration;

use padron_core::DocumentKind;
use url::Url;
use zeroize::Zeroizing;

/// Default registry gateway.
pub const DEFAULT_API_URL: &str = "https://api.decolecta.com";

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Default retries after the first attempt.
pub const DEFAULT_RETRIES: u32 = 2;

/// Default base delay for linear backoff.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// Default cache time-to-live.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Configuration for connecting to the document registry.
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the registry gateway.
    /// Default: <https://api.decolecta.com>
    pub base_url: Url,
    /// Bearer token. `None` when the gateway is an internal proxy that
    /// injects credentials itself.
    pub api_token: Option<Zeroizing<String>>,
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Retries after the first attempt on 5xx and network errors.
    pub retries: u32,
    /// Base delay in milliseconds; attempt `n` waits `n * retry_delay_ms`.
    pub retry_delay_ms: u64,
    /// How long a successful lookup stays fresh in the cache.
    pub cache_ttl_secs: u64,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_ms", &self.timeout_ms)
            .field("retries", &self.retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PADRON_API_URL` (default: `https://api.decolecta.com`)
    /// - `PADRON_API_TOKEN` (optional)
    /// - `PADRON_TIMEOUT_MS` (default: 15000)
    /// - `PADRON_RETRIES` (default: 2)
    /// - `PADRON_RETRY_DELAY_MS` (default: 1000)
    /// - `PADRON_CACHE_TTL_SECS` (default: 300)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token = std::env::var("PADRON_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(Zeroizing::new);

        Ok(Self {
            base_url: env_url("PADRON_API_URL", DEFAULT_API_URL)?,
            api_token,
            timeout_ms: env_number("PADRON_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?,
            retries: env_number("PADRON_RETRIES", DEFAULT_RETRIES)?,
            retry_delay_ms: env_number("PADRON_RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS)?,
            cache_ttl_secs: env_number("PADRON_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
        })
    }

    /// Configuration pointing at a local server (mock or proxy), no token,
    /// short timeout and no retry delay.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` cannot be parsed.
    pub fn local(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl("base_url".to_string(), e.to_string()))?;
        Ok(Self {
            base_url,
            api_token: None,
            timeout_ms: 2_000,
            retries: DEFAULT_RETRIES,
            retry_delay_ms: 0,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        })
    }

    /// Attach a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(Zeroizing::new(token.into()));
        self
    }

    /// Per-attempt request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base delay between attempts; attempt `n` waits `n` times this.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Lifetime of a cached record.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Per-call defaults derived from this configuration.
    pub fn autocomplete_options(&self) -> AutocompleteOptions {
        AutocompleteOptions {
            use_cache: true,
            timeout: self.timeout(),
            retries: self.retries,
            retry_delay: self.retry_delay(),
            kind: None,
        }
    }
}

/// Per-call lookup options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutocompleteOptions {
    /// Serve fresh cache entries without a network call.
    pub use_cache: bool,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Retries after the first attempt.
    pub retries: u32,
    /// Base delay for linear backoff.
    pub retry_delay: Duration,
    /// Force the document kind instead of inferring it from the digit count.
    pub kind: Option<DocumentKind>,
}

impl Default for AutocompleteOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retries: DEFAULT_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            kind: None,
        }
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_number<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(var.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid number for {0}: {1:?}")]
    InvalidNumber(String, String),
    #[error("invalid API token: {0}")]
    InvalidToken(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_builds_valid_config() {
        let cfg = ClientConfig::local("http://127.0.0.1:9000").unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:9000/");
        assert!(cfg.api_token.is_none());
        assert_eq!(cfg.retries, 2);
        assert_eq!(cfg.retry_delay_ms, 0);
    }

    #[test]
    fn local_rejects_invalid_url() {
        assert!(matches!(
            ClientConfig::local("not a url"),
            Err(ConfigError::InvalidUrl(..))
        ));
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = ClientConfig::local("http://127.0.0.1:9000")
            .unwrap()
            .with_token("super-secret");
        let rendered = format!("{cfg:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn options_follow_config() {
        let mut cfg = ClientConfig::local("http://127.0.0.1:9000").unwrap();
        cfg.timeout_ms = 500;
        cfg.retries = 4;
        cfg.retry_delay_ms = 25;
        let opts = cfg.autocomplete_options();
        assert!(opts.use_cache);
        assert_eq!(opts.timeout, Duration::from_millis(500));
        assert_eq!(opts.retries, 4);
        assert_eq!(opts.retry_delay, Duration::from_millis(25));
    }

    #[test]
    fn default_options_match_documented_defaults() {
        let opts = AutocompleteOptions::default();
        assert_eq!(opts.timeout, Duration::from_millis(15_000));
        assert_eq!(opts.retries, 2);
        assert_eq!(opts.retry_delay, Duration::from_millis(1_000));
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("PADRON_NONEXISTENT_VAR_12345", "https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn env_number_rejects_garbage() {
        std::env::set_var("PADRON_TEST_BAD_NUMBER", "soon");
        let result = env_number::<u64>("PADRON_TEST_BAD_NUMBER", 1);
        std::env::remove_var("PADRON_TEST_BAD_NUMBER");
        assert!(matches!(result, Err(ConfigError::InvalidNumber(..))));
    }

    #[test]
    fn env_number_uses_default_when_var_absent() {
        assert_eq!(
            env_number("PADRON_NONEXISTENT_NUMBER_12345", 7u32).unwrap(),
            7
        );
    }
}
