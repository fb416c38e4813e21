//! In-memory UsageCounterStore.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, PrincipalId};
use crate::ports::UsageCounterStore;

#[derive(Default)]
pub struct InMemoryUsageCounterStore {
    counts: Mutex<HashMap<PrincipalId, u32>>,
}

impl InMemoryUsageCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsageCounterStore for InMemoryUsageCounterStore {
    async fn increment_below(
        &self,
        id: &PrincipalId,
        limit: u32,
    ) -> Result<Option<u32>, DomainError> {
        let mut counts = self.counts.lock().await;
        let current = counts.get(id).copied().unwrap_or(0);
        if current >= limit {
            return Ok(None);
        }
        let next = current + 1;
        counts.insert(id.clone(), next);
        Ok(Some(next))
    }

    async fn count(&self, id: &PrincipalId) -> Result<u32, DomainError> {
        Ok(self.counts.lock().await.get(id).copied().unwrap_or(0))
    }
}
