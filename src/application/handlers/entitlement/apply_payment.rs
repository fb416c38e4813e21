//! ApplyPaymentHandler - writes a resolved plan onto the principal owning an email.

use std::sync::Arc;

use crate::application::RetryPolicy;
use crate::domain::entitlement::{EntitlementError, EntitlementRecord, ResolvedPlan};
use crate::domain::foundation::Email;
use crate::ports::{Clock, EntitlementStore};

/// Command to apply a paid plan.
#[derive(Debug, Clone)]
pub struct ApplyPaymentCommand {
    pub email: Email,
    pub plan: ResolvedPlan,
}

/// Result of applying a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyPaymentResult {
    Applied(EntitlementRecord),
    PrincipalNotFound,
}

/// Applies a plan in one conditional write.
///
/// Expiry is computed from the clock at apply time, so a replayed event moves
/// a periodic expiry forward from the replay rather than adding a second
/// term. The plan is written whatever the current tier is.
pub struct ApplyPaymentHandler {
    store: Arc<dyn EntitlementStore>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
}

impl ApplyPaymentHandler {
    pub fn new(store: Arc<dyn EntitlementStore>, clock: Arc<dyn Clock>, retry: RetryPolicy) -> Self {
        Self { store, clock, retry }
    }

    pub async fn handle(
        &self,
        cmd: ApplyPaymentCommand,
    ) -> Result<ApplyPaymentResult, EntitlementError> {
        let now = self.clock.now();
        let entitlement = cmd.plan.entitlement_at(now);

        let updated = self
            .retry
            .run("apply_payment", || {
                self.store.apply_by_email(&cmd.email, entitlement, now)
            })
            .await?;

        Ok(match updated {
            Some(record) => ApplyPaymentResult::Applied(record),
            None => ApplyPaymentResult::PrincipalNotFound,
        })
    }
}
