//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `STOREFRONT_CURRENCY` - ISO 4217 code for catalog prices (default: USD)
//! - `COMMERCE_API_BASE_URL` - Commerce API root (default: <http://localhost:8000>)
//! - `COMMERCE_API_TOKEN` - Bearer token for the commerce API
//! - `COMMERCE_API_TIMEOUT_SECS` - Request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use dropship_core::CurrencyCode;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Currency every cart and catalog price is expressed in
    pub currency: CurrencyCode,
    /// Commerce API client configuration
    pub commerce: CommerceApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

/// Commerce API client configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct CommerceApiConfig {
    /// API root, e.g. `http://localhost:8000/`
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Currency the API's float prices are expressed in
    pub currency: CurrencyCode,
}

impl std::fmt::Debug for CommerceApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommerceApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("currency", &self.currency)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if the
    /// API token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let commerce = CommerceApiConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            currency: commerce.currency,
            commerce,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS (secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl CommerceApiConfig {
    /// Load the commerce API settings on their own (used by the CLI too).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let base_url = parse_base_url(
            "COMMERCE_API_BASE_URL",
            &get_env_or_default("COMMERCE_API_BASE_URL", "http://localhost:8000"),
        )?;
        let token = get_optional_env("COMMERCE_API_TOKEN")
            .map(|token| {
                validate_not_placeholder(&token, "COMMERCE_API_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(token))
            })
            .transpose()?;
        let timeout = get_env_or_default("COMMERCE_API_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("COMMERCE_API_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        let currency = get_env_or_default("STOREFRONT_CURRENCY", "USD")
            .parse::<CurrencyCode>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_CURRENCY".to_string(), e.to_string())
            })?;

        Ok(Self {
            base_url,
            token,
            timeout: Duration::from_secs(timeout),
            currency,
        })
    }

    /// Configuration pointing at `base_url` with defaults for everything else.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("COMMERCE_API_BASE_URL", base_url)?,
            token: None,
            timeout: Duration::from_secs(10),
            currency: CurrencyCode::default(),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an API root URL. A trailing slash is added so relative joins keep
/// any path prefix (e.g. `https://host/api/` + `products`).
fn parse_base_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Reject tokens that are obviously copied from a template.
fn validate_not_placeholder(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_adds_trailing_slash() {
        let url = parse_base_url("X", "https://api.example.com/v1").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/");
        assert_eq!(url.join("products").unwrap().path(), "/v1/products");
    }

    #[test]
    fn test_parse_base_url_rejects_bad_input() {
        assert!(matches!(
            parse_base_url("X", "not a url"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(matches!(
            parse_base_url("X", "ftp://files.example.com"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_validate_not_placeholder() {
        assert!(validate_not_placeholder("your-token-here", "T").is_err());
        assert!(validate_not_placeholder("CHANGEME", "T").is_err());
        assert!(validate_not_placeholder("sk_live_8f3Jq2", "T").is_ok());
    }

    #[test]
    fn test_socket_addr_and_secure() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "https://shop.test".to_string(),
            currency: CurrencyCode::USD,
            commerce: CommerceApiConfig::with_base_url("http://localhost:8000").unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert!(config.is_secure());
    }

    #[test]
    fn test_commerce_config_debug_redacts_token() {
        let mut config = CommerceApiConfig::with_base_url("http://localhost:8000").unwrap();
        config.token = Some(SecretString::from("super_secret_api_token"));

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("localhost:8000"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_token"));
    }
}
