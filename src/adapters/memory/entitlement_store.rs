//! In-memory EntitlementStore.
//!
//! Used by tests and local runs without a database. A single `Mutex` guards
//! the whole map, so every method is atomic in the same way a single-row
//! statement is in Postgres.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::entitlement::{Entitlement, EntitlementRecord};
use crate::domain::foundation::{DomainError, Email, ErrorCode, PrincipalId, Timestamp};
use crate::ports::EntitlementStore;

#[derive(Default)]
pub struct InMemoryEntitlementStore {
    records: Mutex<HashMap<PrincipalId, EntitlementRecord>>,
    transient_failures: AtomicU32,
    failing_downgrades: Mutex<HashSet<PrincipalId>>,
}

impl InMemoryEntitlementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` as-is, replacing any existing one.
    pub async fn seed(&self, record: EntitlementRecord) {
        self.records
            .lock()
            .await
            .insert(record.principal_id.clone(), record);
    }

    /// The next `n` calls fail with `StoreUnavailable`.
    pub fn fail_next(&self, n: u32) {
        self.transient_failures.store(n, Ordering::SeqCst);
    }

    /// Every downgrade of `id` fails with `DatabaseError`.
    pub async fn fail_downgrade_for(&self, id: PrincipalId) {
        self.failing_downgrades.lock().await.insert(id);
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        let consumed = self
            .transient_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if consumed {
            Err(DomainError::unavailable("in-memory store unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EntitlementStore for InMemoryEntitlementStore {
    async fn create_free(&self, record: &EntitlementRecord) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut records = self.records.lock().await;

        if records.contains_key(&record.principal_id) {
            return Ok(false);
        }
        if records
            .values()
            .any(|r| r.principal_email == record.principal_email)
        {
            return Err(DomainError::new(
                ErrorCode::PrincipalExists,
                "Email is already bound to another principal",
            ));
        }

        let fresh = EntitlementRecord::new_free(
            record.principal_id.clone(),
            record.principal_email.clone(),
            record.updated_at,
        );
        records.insert(fresh.principal_id.clone(), fresh);
        Ok(true)
    }

    async fn find_by_id(&self, id: &PrincipalId) -> Result<Option<EntitlementRecord>, DomainError> {
        self.check_available()?;
        Ok(self.records.lock().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<EntitlementRecord>, DomainError> {
        self.check_available()?;
        Ok(self
            .records
            .lock()
            .await
            .values()
            .find(|r| &r.principal_email == email)
            .cloned())
    }

    async fn apply_by_email(
        &self,
        email: &Email,
        entitlement: Entitlement,
        now: Timestamp,
    ) -> Result<Option<EntitlementRecord>, DomainError> {
        self.check_available()?;
        let mut records = self.records.lock().await;

        Ok(records
            .values_mut()
            .find(|r| &r.principal_email == email)
            .map(|record| {
                record.entitlement = entitlement;
                record.updated_at = now;
                record.clone()
            }))
    }

    async fn find_lapsed(&self, now: Timestamp) -> Result<Vec<EntitlementRecord>, DomainError> {
        self.check_available()?;
        let mut lapsed: Vec<_> = self
            .records
            .lock()
            .await
            .values()
            .filter(|r| r.entitlement.is_lapsed(now))
            .cloned()
            .collect();
        lapsed.sort_by_key(|r| r.expires_at());
        Ok(lapsed)
    }

    async fn downgrade_if_lapsed(
        &self,
        id: &PrincipalId,
        now: Timestamp,
    ) -> Result<bool, DomainError> {
        self.check_available()?;
        if self.failing_downgrades.lock().await.contains(id) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("downgrade failed for {}", id),
            ));
        }

        let mut records = self.records.lock().await;
        match records.get_mut(id) {
            Some(record) if record.entitlement.is_lapsed(now) => {
                record.entitlement = Entitlement::Free;
                record.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
