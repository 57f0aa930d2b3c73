//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MALAI_DATABASE_URL` - `PostgreSQL` connection string for the privileged
//!   (service) role. Falls back to the generic `DATABASE_URL`, which in hosted
//!   deployments carries the restricted credential.
//! - `LINE_CHANNEL_ACCESS_TOKEN` - LINE Messaging API channel access token
//!
//! ## Optional
//! - `MALAI_HOST` - Bind address (default: 127.0.0.1)
//! - `MALAI_PORT` - Listen port (default: 3000)
//! - `LINE_LIFF_ID` - Client-facing LIFF app identifier, echoed to the web client
//! - `LINE_NOTIFY_TARGET` - LINE ID the new-order push is sent to; when unset the
//!   push targets the purchasing customer
//! - `ASSISTANT_URL` - Chat-completion endpoint for the product Q&A bot
//! - `ASSISTANT_MODEL` - Model name sent to the assistant endpoint (default: gemma3:4b)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use malai_core::LineUserId;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// LINE Messaging API configuration
    pub line: LineConfig,
    /// Product assistant configuration, when a chat endpoint is configured
    pub assistant: Option<AssistantConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// LINE Messaging API configuration.
///
/// Implements `Debug` manually to redact the channel token.
#[derive(Clone)]
pub struct LineConfig {
    /// Channel access token for the Messaging API (Bearer auth)
    pub channel_access_token: SecretString,
    /// LIFF app ID handed to the browser client
    pub liff_id: Option<String>,
    /// Push target for new-order notifications (operations account).
    /// `None` falls back to pushing to the customer who placed the order.
    pub notify_target: Option<LineUserId>,
}

impl std::fmt::Debug for LineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineConfig")
            .field("channel_access_token", &"[REDACTED]")
            .field("liff_id", &self.liff_id)
            .field("notify_target", &self.notify_target)
            .finish()
    }
}

/// Product assistant (chat completion) configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Chat-completion endpoint URL
    pub url: String,
    /// Model name passed through in the request body
    pub model: String,
}

impl ApiConfig {
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

        let database_url = get_database_url("MALAI_DATABASE_URL")?;
        let host = get_env_or_default("MALAI_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("MALAI_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("MALAI_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("MALAI_PORT".to_string(), e.to_string()))?;

        let line = LineConfig::from_env()?;
        let assistant = AssistantConfig::from_env();
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            line,
            assistant,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl LineConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            channel_access_token: get_required_secret("LINE_CHANNEL_ACCESS_TOKEN")?,
            liff_id: get_optional_env("LINE_LIFF_ID"),
            notify_target: get_optional_env("LINE_NOTIFY_TARGET").map(LineUserId::new),
        })
    }
}

impl AssistantConfig {
    fn from_env() -> Option<Self> {
        let url = get_optional_env("ASSISTANT_URL")?;
        Some(Self {
            url,
            model: get_env_or_default("ASSISTANT_MODEL", "gemma3:4b"),
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

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL` (the restricted
/// credential in hosted deployments).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        tracing::warn!("{primary_key} not set, falling back to DATABASE_URL");
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            line: LineConfig {
                channel_access_token: SecretString::from("token"),
                liff_id: None,
                notify_target: None,
            },
            assistant: None,
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_line_config_debug_redacts_token() {
        let config = LineConfig {
            channel_access_token: SecretString::from("super_secret_channel_token"),
            liff_id: Some("1234567890-abcdefgh".to_string()),
            notify_target: Some(LineUserId::new("U0123456789")),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_channel_token"));
        assert!(debug_output.contains("1234567890-abcdefgh"));
    }
}
