//! Checkout provider port.
//!
//! Creates a hosted checkout session for a paid plan. The provider reports the
//! outcome later through the payment webhook, so this port only has to hand
//! back a URL for the client to follow.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::entitlement::PaidPlan;
use crate::domain::foundation::{Email, PrincipalId};

/// What the provider needs to start a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub principal_id: PrincipalId,
    pub email: Email,
    pub plan: PaidPlan,
    pub product_id: String,
}

/// A session the client can redirect to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSession {
    pub checkout_url: String,
    pub plan: PaidPlan,
}

/// Checkout session could not be created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("checkout provider misconfigured: {0}")]
    Misconfigured(String),

    #[error("checkout provider unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    async fn create_session(&self, request: &CheckoutRequest)
        -> Result<CheckoutSession, CheckoutError>;
}
