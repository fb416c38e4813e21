//! PostgreSQL implementation of EntitlementStore.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::map_sqlx_error;
use crate::domain::entitlement::{Entitlement, EntitlementRecord, Tier};
use crate::domain::foundation::{DomainError, Email, ErrorCode, PrincipalId, Timestamp};
use crate::ports::EntitlementStore;

const EMAIL_CONSTRAINT: &str = "entitlements_principal_email_key";

/// Entitlement records in the `entitlements` table.
pub struct PostgresEntitlementStore {
    pool: PgPool,
}

impl PostgresEntitlementStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EntitlementRow {
    principal_id: String,
    principal_email: String,
    tier: String,
    expires_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EntitlementRow> for EntitlementRecord {
    type Error = DomainError;

    fn try_from(row: EntitlementRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| {
            DomainError::corruption(reason).with_detail("principal_id", row.principal_id.clone())
        };

        let tier = Tier::from_str(&row.tier).map_err(|e| corrupt(e.to_string()))?;
        let entitlement = Entitlement::from_parts(tier, row.expires_at.map(Timestamp::from_datetime))
            .map_err(|e| corrupt(e.to_string()))?;
        let principal_email =
            Email::parse(&row.principal_email).map_err(|e| corrupt(e.to_string()))?;
        let principal_id = PrincipalId::new(row.principal_id.clone()).map_err(|e| corrupt(e.to_string()))?;

        Ok(EntitlementRecord {
            principal_id,
            principal_email,
            entitlement,
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Converts scanned rows, logging and skipping any that fail the invariant so
/// one bad row cannot block the rest of a sweep.
fn lapsed_records(rows: Vec<EntitlementRow>) -> Vec<EntitlementRecord> {
    rows.into_iter()
        .filter_map(|row| match EntitlementRecord::try_from(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::error!(
                    principal_id = e.details.get("principal_id").map(String::as_str).unwrap_or(""),
                    error = %e,
                    "Skipping corrupt entitlement row in lapse scan"
                );
                None
            }
        })
        .collect()
}

#[async_trait]
impl EntitlementStore for PostgresEntitlementStore {
    async fn create_free(&self, record: &EntitlementRecord) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO entitlements (principal_id, principal_email, tier, expires_at, updated_at)
            VALUES ($1, $2, 'free', NULL, $3)
            ON CONFLICT (principal_id) DO NOTHING
            "#,
        )
        .bind(record.principal_id.as_str())
        .bind(record.principal_email.as_str())
        .bind(record.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some(EMAIL_CONSTRAINT) {
                    return DomainError::new(
                        ErrorCode::PrincipalExists,
                        "Email is already bound to another principal",
                    );
                }
            }
            map_sqlx_error("Failed to create entitlement", e)
        })?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_id(&self, id: &PrincipalId) -> Result<Option<EntitlementRecord>, DomainError> {
        let row: Option<EntitlementRow> = sqlx::query_as(
            r#"
            SELECT principal_id, principal_email, tier, expires_at, updated_at
            FROM entitlements
            WHERE principal_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to find entitlement", e))?;

        row.map(EntitlementRecord::try_from).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<EntitlementRecord>, DomainError> {
        let row: Option<EntitlementRow> = sqlx::query_as(
            r#"
            SELECT principal_id, principal_email, tier, expires_at, updated_at
            FROM entitlements
            WHERE principal_email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to find entitlement", e))?;

        row.map(EntitlementRecord::try_from).transpose()
    }

    async fn apply_by_email(
        &self,
        email: &Email,
        entitlement: Entitlement,
        now: Timestamp,
    ) -> Result<Option<EntitlementRecord>, DomainError> {
        let row: Option<EntitlementRow> = sqlx::query_as(
            r#"
            UPDATE entitlements
            SET tier = $2, expires_at = $3, updated_at = $4
            WHERE principal_email = $1
            RETURNING principal_id, principal_email, tier, expires_at, updated_at
            "#,
        )
        .bind(email.as_str())
        .bind(entitlement.tier().as_str())
        .bind(entitlement.expires_at().map(|t| *t.as_datetime()))
        .bind(now.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to apply entitlement", e))?;

        row.map(EntitlementRecord::try_from).transpose()
    }

    async fn find_lapsed(&self, now: Timestamp) -> Result<Vec<EntitlementRecord>, DomainError> {
        let rows: Vec<EntitlementRow> = sqlx::query_as(
            r#"
            SELECT principal_id, principal_email, tier, expires_at, updated_at
            FROM entitlements
            WHERE tier = 'periodic' AND expires_at < $1
            ORDER BY expires_at
            "#,
        )
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to scan lapsed entitlements", e))?;

        Ok(lapsed_records(rows))
    }

    async fn downgrade_if_lapsed(
        &self,
        id: &PrincipalId,
        now: Timestamp,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE entitlements
            SET tier = 'free', expires_at = NULL, updated_at = $2
            WHERE principal_id = $1 AND tier = 'periodic' AND expires_at < $2
            "#,
        )
        .bind(id.as_str())
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to downgrade entitlement", e))?;

        Ok(result.rows_affected() == 1)
    }
}
