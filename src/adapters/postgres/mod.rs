//! PostgreSQL adapters - Database implementations for storage ports.
//!
//! - `PostgresEntitlementStore` - Entitlement records
//! - `PostgresUsageCounterStore` - Free-tier usage counters
//!
//! Schema lives in `migrations/` and is applied with `sqlx::migrate!`.

mod entitlement_store;
mod usage_counter_store;

pub use entitlement_store::PostgresEntitlementStore;
pub use usage_counter_store::PostgresUsageCounterStore;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Maps a sqlx error, marking connectivity failures as transient.
pub(crate) fn map_sqlx_error(context: &str, err: sqlx::Error) -> DomainError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            DomainError::unavailable(format!("{}: {}", context, err))
        }
        other => DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, other)),
    }
}
