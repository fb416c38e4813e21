//! Entitlement handlers.
//!
//! ## Commands
//! - Provisioning the free record for a new account
//! - Applying a paid plan from a payment event
//! - Processing payment webhooks end to end
//! - Consuming free-tier quota
//! - Starting a checkout session
//! - Sweeping lapsed periodic entitlements
//!
//! ## Queries
//! - Get the caller's plan

mod apply_payment;
mod check_and_consume;
mod create_checkout_session;
mod get_my_plan;
mod handle_payment_webhook;
mod provision_entitlement;
mod sweep_expired;

// Commands
pub use apply_payment::{ApplyPaymentCommand, ApplyPaymentHandler, ApplyPaymentResult};
pub use check_and_consume::{CheckAndConsumeCommand, CheckAndConsumeHandler};
pub use create_checkout_session::{CreateCheckoutSessionCommand, CreateCheckoutSessionHandler};
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, WebhookOutcome,
};
pub use provision_entitlement::{
    ProvisionEntitlementCommand, ProvisionEntitlementHandler, ProvisionEntitlementResult,
};
pub use sweep_expired::{SweepExpiredHandler, SweepReport};

// Queries
pub use get_my_plan::{GetMyPlanHandler, GetMyPlanQuery};
