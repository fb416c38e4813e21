//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `PROMPT_MARKET` prefix
//! and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use prompt_market::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod payment;
mod retry;
mod server;
mod sweeper;
mod usage;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use retry::RetryConfig;
pub use server::{Environment, ServerConfig};
pub use sweeper::SweeperConfig;
pub use usage::UsageConfig;

use serde::Deserialize;

/// Root application configuration.
///
/// Built once at startup and handed to the components that need it.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub auth: AuthConfig,

    pub payment: PaymentConfig,

    #[serde(default)]
    pub usage: UsageConfig,

    #[serde(default)]
    pub sweeper: SweeperConfig,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` if present (development)
    /// 2. Reads variables with the `PROMPT_MARKET` prefix
    /// 3. Splits nested keys on `__`
    ///
    /// # Environment Variable Format
    ///
    /// - `PROMPT_MARKET__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PROMPT_MARKET__PAYMENT__WEBHOOK_SECRET=...` -> `payment.webhook_secret`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when required variables are missing or a value
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PROMPT_MARKET")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation of every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let environment = self.server.environment;
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(environment)?;
        self.payment.validate(environment)?;
        self.sweeper.validate()?;
        self.retry.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const REQUIRED: &[(&str, &str)] = &[
        ("PROMPT_MARKET__DATABASE__URL", "postgresql://test@localhost/test"),
        ("PROMPT_MARKET__AUTH__JWT_SECRET", "dev-secret"),
        ("PROMPT_MARKET__AUTH__ISSUER", "https://accounts.example.com"),
        ("PROMPT_MARKET__AUTH__AUDIENCE", "prompt-market-api"),
        ("PROMPT_MARKET__PAYMENT__PERIODIC_PRODUCT_ID", "prod_yearly"),
        ("PROMPT_MARKET__PAYMENT__PERPETUAL_PRODUCT_ID", "prod_lifetime"),
        ("PROMPT_MARKET__PAYMENT__CHECKOUT_BASE_URL", "https://pay.example.com/checkout"),
    ];

    const OPTIONAL: &[&str] = &[
        "PROMPT_MARKET__PAYMENT__WEBHOOK_SECRET",
        "PROMPT_MARKET__SERVER__ENVIRONMENT",
        "PROMPT_MARKET__USAGE__FREE_QUOTA",
    ];

    fn with_env<T>(extra: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|p| p.into_inner());
        for (k, v) in REQUIRED.iter().chain(extra) {
            env::set_var(k, v);
        }
        let out = f();
        for (k, _) in REQUIRED {
            env::remove_var(k);
        }
        for k in OPTIONAL {
            env::remove_var(k);
        }
        out
    }

    #[test]
    fn loads_with_defaults() {
        let config = with_env(&[], AppConfig::load).unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.usage.free_quota, 10);
        assert_eq!(config.payment.signature_header, "x-signature");
        assert!(config.payment.webhook_secret().is_none());
        assert!(config.sweeper.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overrides_nested_values() {
        let config = with_env(
            &[
                ("PROMPT_MARKET__USAGE__FREE_QUOTA", "25"),
                ("PROMPT_MARKET__PAYMENT__WEBHOOK_SECRET", "whsec_abc"),
            ],
            AppConfig::load,
        )
        .unwrap();
        assert_eq!(config.usage.free_quota, 25);
        assert!(config.payment.webhook_secret().is_some());
    }

    #[test]
    fn production_without_webhook_secret_is_invalid() {
        let config = with_env(
            &[("PROMPT_MARKET__SERVER__ENVIRONMENT", "production")],
            AppConfig::load,
        )
        .unwrap();
        assert!(config.is_production());
        assert!(config.validate().is_err());
    }
}
