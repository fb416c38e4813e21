//! Entitlement store port.
//!
//! One record per principal, keyed by `principal_id` with `principal_email`
//! as a unique secondary key. Every mutating method is a single-row atomic
//! statement; callers never read, modify in memory, and write back.
//!
//! Three independent writers share this store:
//!
//! - provisioning (`create_free`)
//! - the payment updater (`apply_by_email`)
//! - the expiry sweeper (`downgrade_if_lapsed`)

use async_trait::async_trait;

use crate::domain::entitlement::{Entitlement, EntitlementRecord};
use crate::domain::foundation::{DomainError, Email, PrincipalId, Timestamp};

/// Persistence port for entitlement records.
///
/// # Errors
///
/// All methods return:
/// - `StoreUnavailable` for transient connectivity failures (retryable)
/// - `DataCorruption` when a stored row violates the tier/expiry invariant
/// - `DatabaseError` for anything else
#[async_trait]
pub trait EntitlementStore: Send + Sync {
    /// Insert a free record unless one already exists for the principal.
    ///
    /// Returns `true` when a row was inserted, `false` when the principal was
    /// already provisioned (the existing row is left untouched).
    ///
    /// # Errors
    ///
    /// - `PrincipalExists` if the email is already bound to another principal
    async fn create_free(&self, record: &EntitlementRecord) -> Result<bool, DomainError>;

    /// Find a record by principal id.
    async fn find_by_id(&self, id: &PrincipalId) -> Result<Option<EntitlementRecord>, DomainError>;

    /// Find a record by principal email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<EntitlementRecord>, DomainError>;

    /// Overwrite tier and expiry of the record owning `email`.
    ///
    /// Single conditional write; returns the updated record, or `None` when no
    /// record has that email. Last write wins.
    async fn apply_by_email(
        &self,
        email: &Email,
        entitlement: Entitlement,
        now: Timestamp,
    ) -> Result<Option<EntitlementRecord>, DomainError>;

    /// Periodic records whose expiry is strictly before `now`.
    async fn find_lapsed(&self, now: Timestamp) -> Result<Vec<EntitlementRecord>, DomainError>;

    /// Downgrade to free only if the record is still periodic and lapsed at
    /// `now`.
    ///
    /// Returns `false` when the condition no longer holds, for example a
    /// renewal landed after the lapsed scan.
    async fn downgrade_if_lapsed(&self, id: &PrincipalId, now: Timestamp)
        -> Result<bool, DomainError>;
}
