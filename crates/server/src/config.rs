//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FORNO_TOKEN_SECRET` - Bearer token signing secret (min 32 chars, high entropy)
//! - `STRIPE_SECRET_KEY` - Card processor API secret key
//! - `MAILGUN_API_KEY` - Mail API key
//! - `MAILGUN_DOMAIN` - Mail sending domain (e.g., mg.example.com)
//!
//! ## Optional
//! - `FORNO_HOST` - Bind address (default: 127.0.0.1)
//! - `FORNO_PORT` - Listen port (default: 3000)
//! - `FORNO_MENU_PATH` - Path to a JSON menu file (default: built-in menu)
//! - `STRIPE_API_BASE` - Card processor base URL (default: <https://api.stripe.com>)
//! - `STRIPE_TIMEOUT_SECS` - Card processor request timeout (default: 15)
//! - `MAILGUN_API_BASE` - Mail API base URL (default: <https://api.mailgun.net>)
//! - `MAILGUN_TIMEOUT_SECS` - Mail request timeout (default: 15)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_TOKEN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default timeout for outbound API calls, in seconds.
const DEFAULT_TIMEOUT_SECS: &str = "15";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
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

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Bearer token signing secret
    pub token_secret: SecretString,
    /// Optional path to a JSON menu file
    pub menu_path: Option<PathBuf>,
    /// Card processor API configuration
    pub stripe: StripeConfig,
    /// Mail API configuration
    pub mailgun: MailgunConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Card processor API configuration.
///
/// Implements `Debug` manually to redact the secret key.
#[derive(Clone)]
pub struct StripeConfig {
    /// API base URL
    pub api_base: Url,
    /// API secret key
    pub secret_key: SecretString,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_base", &self.api_base.as_str())
            .field("secret_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Mail API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct MailgunConfig {
    /// API base URL
    pub api_base: Url,
    /// API key (used as the basic auth password)
    pub api_key: SecretString,
    /// Sending domain
    pub domain: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for MailgunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailgunConfig")
            .field("api_base", &self.api_base.as_str())
            .field("api_key", &"[REDACTED]")
            .field("domain", &self.domain)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("FORNO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("FORNO_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("FORNO_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("FORNO_PORT".to_string(), e.to_string()))?;
        let token_secret = get_validated_secret("FORNO_TOKEN_SECRET")?;
        validate_token_secret(&token_secret, "FORNO_TOKEN_SECRET")?;
        let menu_path = get_optional_env("FORNO_MENU_PATH").map(PathBuf::from);

        let stripe = StripeConfig::from_env()?;
        let mailgun = MailgunConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            token_secret,
            menu_path,
            stripe,
            mailgun,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StripeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: get_url_or_default("STRIPE_API_BASE", "https://api.stripe.com")?,
            secret_key: get_validated_secret("STRIPE_SECRET_KEY")?,
            timeout: get_timeout_secs("STRIPE_TIMEOUT_SECS")?,
        })
    }
}

impl MailgunConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: get_url_or_default("MAILGUN_API_BASE", "https://api.mailgun.net")?,
            api_key: get_validated_secret("MAILGUN_API_KEY")?,
            domain: get_required_env("MAILGUN_DOMAIN")?,
            timeout: get_timeout_secs("MAILGUN_TIMEOUT_SECS")?,
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

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable parsed as a URL, with a default value.
fn get_url_or_default(key: &str, default: &str) -> Result<Url, ConfigError> {
    Url::parse(&get_env_or_default(key, default))
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get a timeout in whole seconds from the environment.
fn get_timeout_secs(key: &str) -> Result<Duration, ConfigError> {
    let secs = get_env_or_default(key, DEFAULT_TIMEOUT_SECS)
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(Duration::from_secs(secs))
}

/// Validate that the token signing secret meets minimum length requirements.
fn validate_token_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_TOKEN_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            token_secret: SecretString::from("x".repeat(32)),
            menu_path: None,
            stripe: StripeConfig {
                api_base: Url::parse("https://api.stripe.com").unwrap(),
                secret_key: SecretString::from("sk_test_9aB3xY"),
                timeout: Duration::from_secs(15),
            },
            mailgun: MailgunConfig {
                api_base: Url::parse("https://api.mailgun.net").unwrap(),
                api_key: SecretString::from("key-9aB3xY"),
                domain: "mg.forno.test".to_string(),
                timeout: Duration::from_secs(15),
            },
            sentry_dsn: None,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_shannon_entropy_high() {
        // Random-looking string should have high entropy
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        let result = validate_secret_strength("changeme123", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_token_secret_too_short() {
        let secret = SecretString::from("short");
        let result = validate_token_secret(&secret, "TEST_TOKEN");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_token_secret_valid_length() {
        let secret = SecretString::from("a".repeat(32));
        let result = validate_token_secret(&secret, "TEST_TOKEN");
        assert!(result.is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_stripe_config_debug_redacts_secret() {
        let config = test_config();

        let debug_output = format!("{:?}", config.stripe);
        assert!(debug_output.contains("api.stripe.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk_test_9aB3xY"));
    }

    #[test]
    fn test_mailgun_config_debug_redacts_key() {
        let config = test_config();

        let debug_output = format!("{:?}", config.mailgun);
        assert!(debug_output.contains("mg.forno.test"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("key-9aB3xY"));
    }
}
