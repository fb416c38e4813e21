//! GetMyPlanHandler - query handler for a principal's own plan.

use std::sync::Arc;

use crate::application::RetryPolicy;
use crate::domain::entitlement::{EntitlementError, PlanView};
use crate::domain::foundation::{ErrorCode, PrincipalId};
use crate::ports::{Clock, EntitlementStore};

#[derive(Debug, Clone)]
pub struct GetMyPlanQuery {
    pub principal_id: PrincipalId,
}

pub struct GetMyPlanHandler {
    store: Arc<dyn EntitlementStore>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
}

impl GetMyPlanHandler {
    pub fn new(store: Arc<dyn EntitlementStore>, clock: Arc<dyn Clock>, retry: RetryPolicy) -> Self {
        Self { store, clock, retry }
    }

    pub async fn handle(&self, query: GetMyPlanQuery) -> Result<PlanView, EntitlementError> {
        let record = self
            .retry
            .run("get_my_plan", || self.store.find_by_id(&query.principal_id))
            .await
            .map_err(|e| {
                if e.code == ErrorCode::DataCorruption {
                    tracing::error!(principal_id = %query.principal_id, error = %e, "Corrupt entitlement record");
                }
                EntitlementError::from(e)
            })?
            .ok_or_else(|| EntitlementError::principal_not_found(query.principal_id.clone()))?;

        Ok(record.plan_view(self.clock.now()))
    }
}
