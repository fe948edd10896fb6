//! Storefront configuration loaded from environment variables.
//!
//! Values are read once at startup; nothing can be overridden per request.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPFRONT_API_BASE_URL` - Remote commerce API origin (e.g., `https://shop-api.example.com`)
//! - `SHOPFRONT_API_PATH` - Shop path segment under `/v2/api/`
//!
//! ## Optional
//! - `SHOPFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPFRONT_PORT` - Listen port (default: 3000)
//! - `SHOPFRONT_BASE_URL` - Public URL for the storefront (default: `http://{host}:{port}`)
//! - `SHOPFRONT_CATALOG_CACHE_SECS` - Product cache TTL in seconds (default: 60)
//! - `SHOPFRONT_LOG_FORMAT` - `json` for JSON log lines, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
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
    /// Remote commerce API configuration
    pub api: CommerceApiConfig,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Remote commerce API configuration.
#[derive(Debug, Clone)]
pub struct CommerceApiConfig {
    /// API origin, without the `/v2/api/...` suffix
    pub base_url: Url,
    /// Shop path segment
    pub api_path: String,
    /// How long product and listing reads stay cached
    pub catalog_ttl: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("SHOPFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("SHOPFRONT_PORT", "3000")?;
        let base_url = get_optional_env("SHOPFRONT_BASE_URL")
            .unwrap_or_else(|| format!("http://{}", SocketAddr::new(host, port)));

        Ok(Self {
            host,
            port,
            base_url,
            api: CommerceApiConfig::from_env()?,
            log_json: get_optional_env("SHOPFRONT_LOG_FORMAT")
                .is_some_and(|format| format.eq_ignore_ascii_case("json")),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl CommerceApiConfig {
    /// Default product cache lifetime.
    pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(60);

    /// Build an API configuration directly.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL is not an absolute http(s) URL
    /// or the API path is blank.
    pub fn new(base_url: &str, api_path: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("SHOPFRONT_API_BASE_URL".to_string(), e.to_string())
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_API_BASE_URL".to_string(),
                format!("unsupported scheme '{}'", base_url.scheme()),
            ));
        }

        let api_path = api_path.trim().trim_matches('/');
        if api_path.is_empty() || api_path.contains('/') {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFRONT_API_PATH".to_string(),
                "must be a single non-empty path segment".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            api_path: api_path.to_string(),
            catalog_ttl: Self::DEFAULT_CATALOG_TTL,
        })
    }

    /// Load the API configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("SHOPFRONT_API_BASE_URL")?;
        let api_path = get_required_env("SHOPFRONT_API_PATH")?;
        let ttl_secs: u64 = parse_env("SHOPFRONT_CATALOG_CACHE_SECS", "60")?;

        Ok(Self {
            catalog_ttl: Duration::from_secs(ttl_secs),
            ..Self::new(&base_url, &api_path)?
        })
    }

    /// Root of the shop's endpoints: `{base_url}/v2/api/{api_path}`.
    #[must_use]
    pub fn endpoint(&self) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v2", "api", self.api_path.as_str()]);
        }
        url
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable, falling back to a default literal.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key)
        .as_deref()
        .unwrap_or(default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
