//! PostgreSQL implementation of UsageCounterStore.

use async_trait::async_trait;
use sqlx::PgPool;

use super::map_sqlx_error;
use crate::domain::foundation::{DomainError, PrincipalId};
use crate::ports::UsageCounterStore;

/// Usage counters in the `usage_counters` table.
pub struct PostgresUsageCounterStore {
    pool: PgPool,
}

impl PostgresUsageCounterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageCounterStore for PostgresUsageCounterStore {
    async fn increment_below(
        &self,
        id: &PrincipalId,
        limit: u32,
    ) -> Result<Option<u32>, DomainError> {
        if limit == 0 {
            return Ok(None);
        }

        // The conflict branch only fires while count < limit, so the
        // statement either increments by one and returns the row or
        // returns nothing.
        let count: Option<i32> = sqlx::query_scalar(
            r#"
            INSERT INTO usage_counters (principal_id, count)
            VALUES ($1, 1)
            ON CONFLICT (principal_id) DO UPDATE
                SET count = usage_counters.count + 1
                WHERE usage_counters.count < $2
            RETURNING count
            "#,
        )
        .bind(id.as_str())
        .bind(i64::from(limit))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to increment usage counter", e))?;

        Ok(count.map(|c| u32::try_from(c).unwrap_or(0)))
    }

    async fn count(&self, id: &PrincipalId) -> Result<u32, DomainError> {
        let count: Option<i32> =
            sqlx::query_scalar("SELECT count FROM usage_counters WHERE principal_id = $1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("Failed to read usage counter", e))?;

        Ok(count.and_then(|c| u32::try_from(c).ok()).unwrap_or(0))
    }
}
