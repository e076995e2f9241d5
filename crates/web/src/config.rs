//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `REVIEWHUT_BASE_URL` - Public URL for the site
//!
//! ## Optional
//! - `REVIEWHUT_HOST` - Bind address (default: 127.0.0.1)
//! - `REVIEWHUT_PORT` - Listen port (default: 3000)
//! - `REVIEWHUT_API_URL` - Backend API base URL, may carry a path prefix (default: <http://localhost:8080>)
//! - `REVIEWHUT_API_KEY` - Bearer token sent to the backend (min 16 chars, high entropy)
//! - `REVIEWHUT_API_TIMEOUT_SECS` - Backend request timeout (default: 10)
//! - `REVIEWHUT_REVIEW_LINK_BASE` - Host for generated review links (default: <https://go.reviewhut.com>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use reviewhut_core::review_link::DEFAULT_LINK_BASE;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_API_KEY_LENGTH: usize = 16;

/// Minimum Shannon entropy of an API key, in bits per character.
const MIN_API_KEY_ENTROPY: f64 = 3.3;

/// Words that mark a value copied from a sample `.env` file.
const PLACEHOLDER_WORDS: &[&str] = &[
    "changeme", "example", "placeholder", "replace", "secret", "your-", "xxx",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Site configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Backend API configuration
    pub api: ApiConfig,
    /// Host generated review links are placed under
    pub review_link_base: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Backend API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL every `/api/...` path is joined onto
    pub base_url: Url,
    /// Optional bearer token
    pub api_key: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl WebConfig {
    /// Load configuration from the environment, reading `.env` first when
    /// one exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `REVIEWHUT_BASE_URL` is unset, a value does
    /// not parse, or `REVIEWHUT_API_KEY` is weak.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            return Err(ConfigError::InvalidEnvVar(".env".to_string(), e.to_string()));
        }

        let host = get_env_or_default("REVIEWHUT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("REVIEWHUT_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("REVIEWHUT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("REVIEWHUT_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("REVIEWHUT_BASE_URL")?;
        let review_link_base = get_env_or_default("REVIEWHUT_REVIEW_LINK_BASE", DEFAULT_LINK_BASE);
        let review_link_base = parse_url("REVIEWHUT_REVIEW_LINK_BASE", &review_link_base)?
            .as_str()
            .trim_end_matches('/')
            .to_string();

        let api = ApiConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            api,
            review_link_base,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_sample_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_sample_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_url(
            "REVIEWHUT_API_URL",
            &get_env_or_default("REVIEWHUT_API_URL", "http://localhost:8080"),
        )?;
        let timeout_secs = get_env_or_default("REVIEWHUT_API_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("REVIEWHUT_API_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        let api_key = match get_optional_env("REVIEWHUT_API_KEY") {
            Some(value) => {
                check_api_key(&value, "REVIEWHUT_API_KEY")?;
                Some(SecretString::from(value))
            }
            None => None,
        };

        Ok(Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an absolute http(s) URL.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Parse a Sentry sample rate in `[0.0, 1.0]`.
fn get_sample_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(value) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = value
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}

/// Shannon entropy of `s` in bits per character.
fn entropy_per_char(s: &str) -> f64 {
    let counts = s.chars().fold(BTreeMap::<char, u32>::new(), |mut counts, c| {
        *counts.entry(c).or_default() += 1;
        counts
    });
    let total: u32 = counts.values().sum();
    if total == 0 {
        return 0.0;
    }

    counts
        .values()
        .map(|&n| {
            let p = f64::from(n) / f64::from(total);
            -p * p.log2()
        })
        .sum()
}

/// Reject API keys that are short, copied from a sample file, or repetitive.
fn check_api_key(key: &str, var_name: &str) -> Result<(), ConfigError> {
    let insecure = |reason: String| Err(ConfigError::InsecureSecret(var_name.to_string(), reason));

    let length = key.chars().count();
    if length < MIN_API_KEY_LENGTH {
        return insecure(format!(
            "must be at least {MIN_API_KEY_LENGTH} characters (got {length})"
        ));
    }

    let lower = key.to_lowercase();
    if let Some(word) = PLACEHOLDER_WORDS.iter().find(|w| lower.contains(*w)) {
        return insecure(format!("looks like a placeholder (contains '{word}')"));
    }

    let entropy = entropy_per_char(key);
    if entropy < MIN_API_KEY_ENTROPY {
        return insecure(format!(
            "too repetitive ({entropy:.2} bits/char, need {MIN_API_KEY_ENTROPY:.1})"
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> WebConfig {
        WebConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            api: ApiConfig {
                base_url: Url::parse("http://localhost:8080").unwrap(),
                api_key: Some(SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6")),
                timeout: Duration::from_secs(10),
            },
            review_link_base: DEFAULT_LINK_BASE.to_string(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_entropy_per_char() {
        assert!(entropy_per_char("").abs() < f64::EPSILON);
        assert!(entropy_per_char("zzzz").abs() < f64::EPSILON);
        assert!((entropy_per_char("abab") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_api_key_checks() {
        let rejected = [
            "k3Y!8s",                            // short
            "changeme-0x7Fq2LmZ9pW",             // placeholder
            "abababababababababab",              // repetitive
        ];
        for key in rejected {
            assert!(
                matches!(check_api_key(key, "REVIEWHUT_API_KEY"), Err(ConfigError::InsecureSecret(..))),
                "accepted {key}"
            );
        }
        assert!(check_api_key("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "REVIEWHUT_API_KEY").is_ok());
    }

    #[test]
    fn test_parse_url_rejects_other_schemes() {
        assert!(parse_url("TEST_URL", "ftp://files.reviewhut.com").is_err());
        assert!(parse_url("TEST_URL", "not a url").is_err());
        assert!(parse_url("TEST_URL", "https://api.reviewhut.com").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_api_config_debug_redacts_key() {
        let debug_output = format!("{:?}", test_config().api);
        assert!(debug_output.contains("localhost:8080"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("aB3$xY9"));
    }
}
