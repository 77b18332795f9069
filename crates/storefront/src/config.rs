//! Cart client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ACADSHOP_BASE_URL` - Origin of the storefront serving `/api/cart`
//!
//! ## Optional
//! - `ACADSHOP_SESSION_COOKIE` - Session cookie identifying the cart (sent as `Cookie`)
//! - `ACADSHOP_PLACEHOLDER_IMAGE` - Image shown for lines without a usable image
//!   (default: /static/images/placeholder.jpg)
//! - `ACADSHOP_CONTINUE_SHOPPING_URL` - Target of the empty-sidebar call to action
//!   (default: /produtos)
//! - `ACADSHOP_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.jpg";
const DEFAULT_CONTINUE_SHOPPING_URL: &str = "/produtos";

/// Whole cookie values left over from an `.env` template (case-insensitive).
///
/// Session cookies are opaque signed blobs, so only an exact match counts;
/// a substring like `xxx` can occur in a real one.
const PLACEHOLDER_VALUES: &[&str] = &[
    "changeme",
    "replace-me",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "secret",
];

/// Prefixes that only appear in template values.
const PLACEHOLDER_PREFIXES: &[&str] = &["your-", "your_", "put-your", "insert-"];

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

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Cart client configuration.
///
/// Implements `Debug` manually to redact the session cookie.
#[derive(Clone)]
pub struct CartClientConfig {
    /// Storefront origin; API paths and form actions resolve against it
    pub base_url: Url,
    /// Session cookie that ties requests to a server-side cart
    pub session_cookie: Option<SecretString>,
    /// Fallback image for cart lines
    pub placeholder_image: String,
    /// Link target for the empty-cart call to action
    pub continue_shopping_url: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for CartClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "[REDACTED]"),
            )
            .field("placeholder_image", &self.placeholder_image)
            .field("continue_shopping_url", &self.continue_shopping_url)
            .field("log_format", &self.log_format)
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl CartClientConfig {
    /// Configuration for a storefront at `base_url` with every optional
    /// setting at its default.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            session_cookie: None,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            continue_shopping_url: DEFAULT_CONTINUE_SHOPPING_URL.to_string(),
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the session cookie looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = Url::parse(&get_required_env("ACADSHOP_BASE_URL")?).map_err(|e| {
            ConfigError::InvalidEnvVar("ACADSHOP_BASE_URL".to_string(), e.to_string())
        })?;

        let session_cookie = get_optional_env("ACADSHOP_SESSION_COOKIE")
            .map(|value| {
                validate_session_cookie(&value, "ACADSHOP_SESSION_COOKIE")?;
                Ok::<_, ConfigError>(SecretString::from(value))
            })
            .transpose()?;

        let log_format = parse_log_format(&get_env_or_default("ACADSHOP_LOG_FORMAT", "pretty"))?;

        Ok(Self {
            base_url,
            session_cookie,
            placeholder_image: get_env_or_default(
                "ACADSHOP_PLACEHOLDER_IMAGE",
                DEFAULT_PLACEHOLDER_IMAGE,
            ),
            continue_shopping_url: get_env_or_default(
                "ACADSHOP_CONTINUE_SHOPPING_URL",
                DEFAULT_CONTINUE_SHOPPING_URL,
            ),
            log_format,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Value for the `Cookie` header, if a session is configured.
    #[must_use]
    pub fn cookie_header(&self) -> Option<&str> {
        self.session_cookie.as_ref().map(|cookie| cookie.expose_secret())
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
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_log_format(value: &str) -> Result<LogFormat, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "pretty" | "text" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(ConfigError::InvalidEnvVar(
            "ACADSHOP_LOG_FORMAT".to_string(),
            format!("expected 'pretty' or 'json', got '{other}'"),
        )),
    }
}

/// Reject session cookies copied verbatim from an `.env` template.
///
/// The cookie may be a bare value or `name=value` pairs; each value is
/// checked on its own.
fn validate_session_cookie(cookie: &str, var_name: &str) -> Result<(), ConfigError> {
    for pair in cookie.split(';') {
        let value = pair
            .split_once('=')
            .map_or(pair, |(_, value)| value)
            .trim()
            .to_lowercase();

        if value.is_empty() {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                "cookie value is empty".to_string(),
            ));
        }

        let is_template = PLACEHOLDER_VALUES.contains(&value.as_str())
            || PLACEHOLDER_PREFIXES
                .iter()
                .any(|prefix| value.starts_with(prefix));
        if is_template {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder ('{value}')"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:5000").unwrap()
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = CartClientConfig::new(base());
        assert_eq!(config.placeholder_image, "/static/images/placeholder.jpg");
        assert_eq!(config.continue_shopping_url, "/produtos");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.cookie_header().is_none());
    }

    #[test]
    fn test_placeholder_cookie_rejected() {
        for cookie in ["session=changeme", "CHANGEME", "session=your-session-cookie", "session="] {
            let result = validate_session_cookie(cookie, "TEST_VAR");
            assert!(
                matches!(result, Err(ConfigError::InsecureSecret(_, _))),
                "{cookie} should be rejected"
            );
        }
    }

    #[test]
    fn test_real_cookie_accepted() {
        let result = validate_session_cookie("session=eyJfZnJlc2giOmZhbHNlfQ.Zx1", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_real_cookie_with_template_like_substrings_accepted() {
        let cookie = "session=.eJwlzjEOwzAIQNG7MGcAYxvsXKbCGNSuSTNVvXtTdX3D03vDI4883rB_rudTjxPJXXxXdxYxxmxXJ3bNX1YAsXxlV";
        assert!(validate_session_cookie(cookie, "ACADSHOP_SESSION_COOKIE").is_ok());

        let cookie = "session=ToDoExampleInsertReplace.abc; remember_token=42|xxxYY";
        assert!(validate_session_cookie(cookie, "ACADSHOP_SESSION_COOKIE").is_ok());
    }

    #[test]
    fn test_parse_log_format() {
        assert_eq!(parse_log_format("JSON").unwrap(), LogFormat::Json);
        assert_eq!(parse_log_format("pretty").unwrap(), LogFormat::Pretty);
        assert!(parse_log_format("xml").is_err());
    }

    #[test]
    fn test_debug_redacts_session_cookie() {
        let mut config = CartClientConfig::new(base());
        config.session_cookie = Some(SecretString::from("session=super_secret_value"));

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("localhost:5000"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_value"));
    }
}
