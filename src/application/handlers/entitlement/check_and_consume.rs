//! CheckAndConsumeHandler - the usage gate for metered actions.

use std::sync::Arc;

use crate::application::RetryPolicy;
use crate::domain::entitlement::{EntitlementError, FreeQuota, Remaining, Tier, UsageDecision};
use crate::domain::foundation::PrincipalId;
use crate::ports::{EntitlementStore, UsageCounterStore};

/// Command to record one metered action.
#[derive(Debug, Clone)]
pub struct CheckAndConsumeCommand {
    pub principal_id: PrincipalId,
}

/// Allows or denies one metered action, consuming quota when allowed.
///
/// Paid tiers bypass the counter entirely. Free principals go through a single
/// conditional increment; a refused increment writes nothing.
///
/// Only the record lookup is retried. The increment is not idempotent, so a
/// transient failure there surfaces immediately.
pub struct CheckAndConsumeHandler {
    store: Arc<dyn EntitlementStore>,
    counters: Arc<dyn UsageCounterStore>,
    quota: FreeQuota,
    retry: RetryPolicy,
}

impl CheckAndConsumeHandler {
    pub fn new(
        store: Arc<dyn EntitlementStore>,
        counters: Arc<dyn UsageCounterStore>,
        quota: FreeQuota,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            store,
            counters,
            quota,
            retry,
        }
    }

    pub async fn handle(
        &self,
        cmd: CheckAndConsumeCommand,
    ) -> Result<UsageDecision, EntitlementError> {
        let record = self
            .retry
            .run("usage_lookup", || self.store.find_by_id(&cmd.principal_id))
            .await?
            .ok_or_else(|| EntitlementError::principal_not_found(cmd.principal_id.clone()))?;

        if record.tier() != Tier::Free {
            return Ok(UsageDecision::Allowed {
                remaining: Remaining::Unlimited,
            });
        }

        let new_count = self
            .counters
            .increment_below(&cmd.principal_id, self.quota.limit())
            .await?;
        let decision = self.quota.decide(new_count);

        if !decision.is_allowed() {
            tracing::info!(
                principal_id = %cmd.principal_id,
                limit = self.quota.limit(),
                "Free usage quota exhausted"
            );
        }
        Ok(decision)
    }
}
