//! CreateCheckoutSessionHandler - starts a hosted checkout for a paid plan.

use std::sync::Arc;

use crate::application::RetryPolicy;
use crate::domain::entitlement::{EntitlementError, PaidPlan, PlanCatalog};
use crate::domain::foundation::PrincipalId;
use crate::ports::{CheckoutError, CheckoutProvider, CheckoutRequest, CheckoutSession, EntitlementStore};

#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionCommand {
    pub principal_id: PrincipalId,
    pub plan: PaidPlan,
}

/// The checkout carries the principal's stored email, which is what the
/// payment webhook later correlates on.
pub struct CreateCheckoutSessionHandler {
    store: Arc<dyn EntitlementStore>,
    provider: Arc<dyn CheckoutProvider>,
    catalog: PlanCatalog,
    retry: RetryPolicy,
}

impl CreateCheckoutSessionHandler {
    pub fn new(
        store: Arc<dyn EntitlementStore>,
        provider: Arc<dyn CheckoutProvider>,
        catalog: PlanCatalog,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            store,
            provider,
            catalog,
            retry,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutSessionCommand,
    ) -> Result<CheckoutSession, EntitlementError> {
        let record = self
            .retry
            .run("checkout_lookup", || self.store.find_by_id(&cmd.principal_id))
            .await?
            .ok_or_else(|| EntitlementError::principal_not_found(cmd.principal_id.clone()))?;

        let request = CheckoutRequest {
            principal_id: record.principal_id,
            email: record.principal_email,
            plan: cmd.plan,
            product_id: self.catalog.product_for(cmd.plan).to_string(),
        };

        self.provider.create_session(&request).await.map_err(|e| {
            tracing::error!(principal_id = %cmd.principal_id, plan = cmd.plan.as_str(), error = %e, "Checkout session failed");
            match e {
                CheckoutError::Misconfigured(msg) => EntitlementError::infrastructure(msg),
                CheckoutError::Unavailable(msg) => EntitlementError::checkout_failed(msg),
            }
        })
    }
}
