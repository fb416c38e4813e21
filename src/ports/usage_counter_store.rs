//! Usage counter port for the free-tier quota.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PrincipalId};

/// Per-principal monotonic counter of metered actions.
#[async_trait]
pub trait UsageCounterStore: Send + Sync {
    /// Atomically increment the counter by one if it is below `limit`.
    ///
    /// Returns the new count, or `None` when the counter was already at or
    /// above `limit` (nothing was written). A missing counter counts as 0.
    ///
    /// Two concurrent calls at `limit - 1` must yield exactly one `Some`.
    async fn increment_below(&self, id: &PrincipalId, limit: u32)
        -> Result<Option<u32>, DomainError>;

    /// Current count, 0 when absent.
    async fn count(&self, id: &PrincipalId) -> Result<u32, DomainError>;
}
