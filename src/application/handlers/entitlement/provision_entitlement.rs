//! ProvisionEntitlementHandler - creates the free record at account creation.
//!
//! Called by the registration flow once an account exists. Safe to call more
//! than once for the same principal.

use std::sync::Arc;

use crate::application::RetryPolicy;
use crate::domain::entitlement::{EntitlementError, EntitlementRecord};
use crate::domain::foundation::{Email, ErrorCode, PrincipalId};
use crate::ports::{Clock, EntitlementStore};

#[derive(Debug, Clone)]
pub struct ProvisionEntitlementCommand {
    pub principal_id: PrincipalId,
    pub email: Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionEntitlementResult {
    Created,
    AlreadyProvisioned,
}

pub struct ProvisionEntitlementHandler {
    store: Arc<dyn EntitlementStore>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
}

impl ProvisionEntitlementHandler {
    pub fn new(store: Arc<dyn EntitlementStore>, clock: Arc<dyn Clock>, retry: RetryPolicy) -> Self {
        Self { store, clock, retry }
    }

    pub async fn handle(
        &self,
        cmd: ProvisionEntitlementCommand,
    ) -> Result<ProvisionEntitlementResult, EntitlementError> {
        let record = EntitlementRecord::new_free(cmd.principal_id, cmd.email, self.clock.now());

        let created = self
            .retry
            .run("provision_entitlement", || self.store.create_free(&record))
            .await
            .map_err(|e| match e.code {
                ErrorCode::PrincipalExists => {
                    EntitlementError::validation("email", "already bound to another principal")
                }
                _ => EntitlementError::from(e),
            })?;

        if created {
            tracing::info!(principal_id = %record.principal_id, "Provisioned free entitlement");
            Ok(ProvisionEntitlementResult::Created)
        } else {
            Ok(ProvisionEntitlementResult::AlreadyProvisioned)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::SystemClock;
    use crate::adapters::memory::InMemoryEntitlementStore;
    use crate::domain::entitlement::Tier;

    fn cmd(id: &str, email: &str) -> ProvisionEntitlementCommand {
        ProvisionEntitlementCommand {
            principal_id: PrincipalId::new(id).unwrap(),
            email: Email::parse(email).unwrap(),
        }
    }

    #[tokio::test]
    async fn provisions_free_record_once() {
        let store = Arc::new(InMemoryEntitlementStore::new());
        let handler = ProvisionEntitlementHandler::new(store.clone(), Arc::new(SystemClock), RetryPolicy::none());

        assert_eq!(
            handler.handle(cmd("p-1", "a@x.com")).await.unwrap(),
            ProvisionEntitlementResult::Created
        );
        assert_eq!(
            handler.handle(cmd("p-1", "a@x.com")).await.unwrap(),
            ProvisionEntitlementResult::AlreadyProvisioned
        );

        let record = store.find_by_id(&PrincipalId::new("p-1").unwrap()).await.unwrap().unwrap();
        assert_eq!(record.tier(), Tier::Free);
        assert_eq!(record.expires_at(), None);
    }

    #[tokio::test]
    async fn email_taken_by_another_principal_is_rejected() {
        let store = Arc::new(InMemoryEntitlementStore::new());
        let handler = ProvisionEntitlementHandler::new(store, Arc::new(SystemClock), RetryPolicy::none());
        handler.handle(cmd("p-1", "a@x.com")).await.unwrap();

        let err = handler.handle(cmd("p-2", "a@x.com")).await.unwrap_err();
        assert_eq!(err.code(), "VALIDATION_FAILED");
    }
}
