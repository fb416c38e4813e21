//! Payment configuration
//!
//! The webhook secret is optional outside production. Without it the
//! webhook runs in open mode and accepts unsigned payloads, which is logged
//! at startup and on every call.

use http::HeaderName;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;
use crate::adapters::http::payments::DEFAULT_SIGNATURE_HEADER;

/// Payment provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Shared HMAC secret for webhook signatures
    pub webhook_secret: Option<SecretString>,

    /// Header carrying the hex signature
    #[serde(default = "default_signature_header")]
    pub signature_header: String,

    /// Product id that grants the periodic tier
    pub periodic_product_id: String,

    /// Product id that grants the perpetual tier
    pub perpetual_product_id: String,

    /// Hosted checkout page of the provider
    pub checkout_base_url: String,

    /// Where the provider sends the buyer after paying
    pub return_url: Option<String>,

    /// Upper bound on webhook processing, in seconds
    #[serde(default = "default_webhook_timeout")]
    pub webhook_timeout_secs: u64,
}

impl PaymentConfig {
    /// Secret, if set and non-empty.
    pub fn webhook_secret(&self) -> Option<SecretString> {
        self.webhook_secret
            .as_ref()
            .filter(|s| !s.expose_secret().trim().is_empty())
            .cloned()
    }

    pub fn signature_header_name(&self) -> Result<HeaderName, ValidationError> {
        HeaderName::from_bytes(self.signature_header.trim().as_bytes())
            .map_err(|_| ValidationError::InvalidSignatureHeader(self.signature_header.clone()))
    }

    pub fn checkout_base_url(&self) -> Result<Url, ValidationError> {
        Url::parse(&self.checkout_base_url)
            .map_err(|e| ValidationError::InvalidCheckoutUrl(e.to_string()))
    }

    pub fn return_url(&self) -> Result<Option<Url>, ValidationError> {
        self.return_url
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| Url::parse(s).map_err(|e| ValidationError::InvalidCheckoutUrl(e.to_string())))
            .transpose()
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }

    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        if environment == Environment::Production && self.webhook_secret().is_none() {
            return Err(ValidationError::WebhookSecretRequired);
        }
        self.signature_header_name()?;

        let periodic = self.periodic_product_id.trim();
        let perpetual = self.perpetual_product_id.trim();
        if periodic.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__PERIODIC_PRODUCT_ID"));
        }
        if perpetual.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__PERPETUAL_PRODUCT_ID"));
        }
        if periodic == perpetual {
            return Err(ValidationError::DuplicateProductId);
        }

        let base = self.checkout_base_url()?;
        if environment == Environment::Production && base.scheme() != "https" {
            return Err(ValidationError::CheckoutUrlMustBeHttps);
        }
        self.return_url()?;

        if self.webhook_timeout_secs == 0 || self.webhook_timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_signature_header() -> String {
    DEFAULT_SIGNATURE_HEADER.to_string()
}

fn default_webhook_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaymentConfig {
        PaymentConfig {
            webhook_secret: Some(SecretString::new("whsec_test".to_string())),
            signature_header: default_signature_header(),
            periodic_product_id: "prod_yearly".to_string(),
            perpetual_product_id: "prod_lifetime".to_string(),
            checkout_base_url: "https://pay.example.com/checkout".to_string(),
            return_url: None,
            webhook_timeout_secs: default_webhook_timeout(),
        }
    }

    #[test]
    fn valid_config_passes_everywhere() {
        assert!(config().validate(Environment::Production).is_ok());
        assert!(config().validate(Environment::Development).is_ok());
    }

    #[test]
    fn missing_secret_only_fails_in_production() {
        let c = PaymentConfig {
            webhook_secret: None,
            ..config()
        };
        assert!(c.validate(Environment::Development).is_ok());
        assert_eq!(
            c.validate(Environment::Production),
            Err(ValidationError::WebhookSecretRequired)
        );
    }

    #[test]
    fn blank_secret_counts_as_missing() {
        let c = PaymentConfig {
            webhook_secret: Some(SecretString::new("  ".to_string())),
            ..config()
        };
        assert!(c.webhook_secret().is_none());
    }

    #[test]
    fn product_ids_must_be_distinct() {
        let c = PaymentConfig {
            perpetual_product_id: "prod_yearly".to_string(),
            ..config()
        };
        assert_eq!(
            c.validate(Environment::Development),
            Err(ValidationError::DuplicateProductId)
        );
    }

    #[test]
    fn production_checkout_requires_https() {
        let c = PaymentConfig {
            checkout_base_url: "http://pay.example.com/checkout".to_string(),
            ..config()
        };
        assert!(c.validate(Environment::Development).is_ok());
        assert_eq!(
            c.validate(Environment::Production),
            Err(ValidationError::CheckoutUrlMustBeHttps)
        );
    }

    #[test]
    fn bad_header_name_is_rejected() {
        let c = PaymentConfig {
            signature_header: "x signature".to_string(),
            ..config()
        };
        assert!(matches!(
            c.validate(Environment::Development),
            Err(ValidationError::InvalidSignatureHeader(_))
        ));
    }
}
