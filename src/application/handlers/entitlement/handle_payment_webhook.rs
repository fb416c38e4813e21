//! HandlePaymentWebhookHandler - verify, normalize, resolve, apply.
//!
//! Every outcome is acknowledged to the provider. Failures are logged here
//! and reported back as a [`WebhookOutcome`] for tests and metrics; nothing
//! in this handler returns an error.

use std::sync::Arc;
use std::time::Duration;

use super::{ApplyPaymentCommand, ApplyPaymentHandler, ApplyPaymentResult};
use crate::domain::entitlement::{PlanCatalog, Tier};
use crate::domain::foundation::PrincipalId;
use crate::domain::payment::{normalize, PaymentEvent, SignatureCheck, SignatureVerifier};

/// Command carrying the raw webhook request.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Body bytes exactly as received.
    pub payload: Vec<u8>,
    /// Value of the signature header, if present.
    pub signature: Option<String>,
}

/// Where processing stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Signature missing or wrong.
    Rejected(SignatureCheck),
    /// Body could not be normalized.
    Malformed(String),
    /// Not a payment-succeeded event.
    Ignored { kind: Option<String> },
    /// Product id is not in the catalog.
    UnknownProduct(String),
    /// No principal has the customer email.
    PrincipalNotFound,
    /// Lookup and write did not finish in time.
    TimedOut,
    /// Store failed after retries.
    Failed(String),
    /// Entitlement updated.
    Applied { principal_id: PrincipalId, tier: Tier },
}

impl WebhookOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            WebhookOutcome::Rejected(_) => "rejected",
            WebhookOutcome::Malformed(_) => "malformed",
            WebhookOutcome::Ignored { .. } => "ignored",
            WebhookOutcome::UnknownProduct(_) => "unknown_product",
            WebhookOutcome::PrincipalNotFound => "principal_not_found",
            WebhookOutcome::TimedOut => "timed_out",
            WebhookOutcome::Failed(_) => "failed",
            WebhookOutcome::Applied { .. } => "applied",
        }
    }
}

pub struct HandlePaymentWebhookHandler {
    verifier: SignatureVerifier,
    catalog: PlanCatalog,
    apply: Arc<ApplyPaymentHandler>,
    timeout: Duration,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        verifier: SignatureVerifier,
        catalog: PlanCatalog,
        apply: Arc<ApplyPaymentHandler>,
        timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            catalog,
            apply,
            timeout,
        }
    }

    pub async fn handle(&self, cmd: HandlePaymentWebhookCommand) -> WebhookOutcome {
        let outcome = self.process(cmd).await;
        tracing::info!(outcome = outcome.label(), "Payment webhook acknowledged");
        outcome
    }

    async fn process(&self, cmd: HandlePaymentWebhookCommand) -> WebhookOutcome {
        // 1. Verify against the raw bytes
        let check = self.verifier.check(&cmd.payload, cmd.signature.as_deref());
        match check {
            SignatureCheck::Valid => {}
            SignatureCheck::Unconfigured => {
                tracing::warn!(
                    "Webhook secret not configured, accepting unsigned payment webhook"
                );
            }
            SignatureCheck::Missing | SignatureCheck::Invalid => {
                tracing::warn!(signature = check.as_str(), "Rejected payment webhook signature");
                return WebhookOutcome::Rejected(check);
            }
        }

        // 2. Normalize
        let event = match normalize(cmd.payload.as_slice()) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "Unusable payment webhook payload");
                return WebhookOutcome::Malformed(e.to_string());
            }
        };

        let (customer_email, product_id) = match event {
            PaymentEvent::PaymentSucceeded {
                customer_email,
                product_id,
            } => (customer_email, product_id),
            PaymentEvent::Other { kind } => {
                tracing::debug!(event_kind = kind.as_deref().unwrap_or("unknown"), "Ignoring webhook event");
                return WebhookOutcome::Ignored { kind };
            }
        };

        // 3. Resolve
        let plan = match self.catalog.resolve(&product_id) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(product_id = %e.0, "Payment for unknown product dropped");
                return WebhookOutcome::UnknownProduct(e.0);
            }
        };

        // 4. Apply, bounded
        let apply = self.apply.handle(ApplyPaymentCommand {
            email: customer_email,
            plan,
        });
        match tokio::time::timeout(self.timeout, apply).await {
            Ok(Ok(ApplyPaymentResult::Applied(record))) => {
                let tier = record.tier();
                tracing::info!(
                    principal_id = %record.principal_id,
                    product_id = %product_id,
                    tier = %tier,
                    "Entitlement updated from payment"
                );
                WebhookOutcome::Applied {
                    principal_id: record.principal_id,
                    tier,
                }
            }
            Ok(Ok(ApplyPaymentResult::PrincipalNotFound)) => {
                tracing::warn!(product_id = %product_id, "Payment for unknown customer email");
                WebhookOutcome::PrincipalNotFound
            }
            Ok(Err(e)) => {
                tracing::error!(product_id = %product_id, error = %e, "Failed to apply payment");
                WebhookOutcome::Failed(e.to_string())
            }
            Err(_) => {
                tracing::warn!(
                    product_id = %product_id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Applying payment timed out, treating as unknown customer"
                );
                WebhookOutcome::TimedOut
            }
        }
    }
}
