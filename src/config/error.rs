//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("JWT secret must be at least 32 bytes in production")]
    WeakJwtSecret,

    #[error("Webhook secret is required in production")]
    WebhookSecretRequired,

    #[error("Invalid signature header name: {0}")]
    InvalidSignatureHeader(String),

    #[error("Periodic and perpetual product ids must differ")]
    DuplicateProductId,

    #[error("Invalid checkout URL: {0}")]
    InvalidCheckoutUrl(String),

    #[error("Checkout URL must use HTTPS in production")]
    CheckoutUrlMustBeHttps,

    #[error("Sweep hour must be between 0 and 23")]
    InvalidSweepHour,

    #[error("Sweep concurrency must be between 1 and 64")]
    InvalidSweepConcurrency,

    #[error("Retry attempts must be between 1 and 10")]
    InvalidRetryAttempts,

    #[error("Retry backoff must not exceed 5000ms")]
    RetryBackoffTooLarge,
}
