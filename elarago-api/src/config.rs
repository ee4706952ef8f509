/// Configuration management for the API server
///
/// Loads configuration from environment variables into a type-safe struct.
/// Billing configuration is optional end-to-end: without a secret key and
/// price id the billing endpoints answer 503 instead of failing at startup.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `SESSION_SECRET`: session token signing key, at least 32 bytes (required)
/// - `APP_HOST`: host to bind to (default: 0.0.0.0)
/// - `APP_PORT`: port to bind to (default: 8080)
/// - `APP_BASE_URL`: public base URL for provider redirects
///   (default: http://localhost:8080)
/// - `STRIPE_SECRET_KEY`: provider API key (optional)
/// - `STRIPE_PRICE_6MO`: price id of the six-month plan (optional)
/// - `STRIPE_WEBHOOK_SECRET`: webhook signing secret (optional; unsigned
///   events are accepted when unset, which is acceptable only in development)
/// - `STRIPE_TIMEOUT_SECONDS`: provider request timeout (default: 10)

use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Session token configuration
    pub session: SessionConfig,

    /// Billing provider configuration
    pub billing: BillingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Public base URL used in provider redirect targets
    pub base_url: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Session token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Secret key for session token signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,
}

/// Billing provider configuration
///
/// All fields are optional; the billing surface degrades gracefully when the
/// provider is not configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Provider API secret key
    pub secret_key: Option<String>,

    /// Price id for the six-month subscription
    pub price_6mo: Option<String>,

    /// Webhook signing secret
    pub webhook_secret: Option<String>,

    /// Request timeout for provider calls (seconds)
    pub request_timeout_seconds: u64,
}

impl BillingConfig {
    /// Whether checkout can be initiated (key and price both present)
    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some() && self.price_6mo.is_some()
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or any variable
    /// has an invalid value.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;
        let base_url =
            env::var("APP_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET environment variable is required"))?;

        if session_secret.len() < 32 {
            anyhow::bail!("SESSION_SECRET must be at least 32 characters long");
        }

        let request_timeout_seconds = env::var("STRIPE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()?;

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                base_url,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            session: SessionConfig {
                secret: session_secret,
            },
            billing: BillingConfig {
                secret_key: env::var("STRIPE_SECRET_KEY").ok().filter(|v| !v.is_empty()),
                price_6mo: env::var("STRIPE_PRICE_6MO").ok().filter(|v| !v.is_empty()),
                webhook_secret: env::var("STRIPE_WEBHOOK_SECRET")
                    .ok()
                    .filter(|v| !v.is_empty()),
                request_timeout_seconds,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            session: SessionConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
            billing: BillingConfig {
                secret_key: None,
                price_6mo: None,
                webhook_secret: None,
                request_timeout_seconds: 10,
            },
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(test_config().bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_billing_requires_key_and_price() {
        let mut config = test_config();
        assert!(!config.billing.is_configured());

        config.billing.secret_key = Some("sk_test".to_string());
        assert!(!config.billing.is_configured());

        config.billing.price_6mo = Some("price_123".to_string());
        assert!(config.billing.is_configured());
    }
}
