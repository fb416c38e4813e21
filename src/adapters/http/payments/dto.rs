//! Request and response bodies for payment endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::entitlement::PaidPlan;
use crate::ports::CheckoutSession;

/// Body of `POST /payments/create-session`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    pub plan: PaidPlan,
}

/// Reply to `POST /payments/create-session`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionResponse {
    pub checkout_url: String,
    pub plan: PaidPlan,
}

impl From<CheckoutSession> for CreateSessionResponse {
    fn from(session: CheckoutSession) -> Self {
        Self {
            checkout_url: session.checkout_url,
            plan: session.plan,
        }
    }
}

/// Acknowledgement returned to the payment provider on every webhook.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

impl WebhookAck {
    pub fn received() -> Self {
        Self { received: true }
    }
}
