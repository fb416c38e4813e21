//! SweepExpiredHandler - downgrades lapsed periodic entitlements.
//!
//! Each lapsed record is downgraded on its own with a conditional write. A
//! record that was renewed between the scan and the write is skipped, and a
//! failure on one record never stops the rest.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::application::RetryPolicy;
use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::{PrincipalId, Timestamp};
use crate::ports::{Clock, EntitlementStore};

/// Counts from one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub examined: usize,
    pub downgraded: usize,
    pub skipped: usize,
    pub failed: usize,
}

enum ItemOutcome {
    Downgraded,
    Skipped,
    Failed,
}

pub struct SweepExpiredHandler {
    store: Arc<dyn EntitlementStore>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
    concurrency: usize,
}

impl SweepExpiredHandler {
    pub fn new(
        store: Arc<dyn EntitlementStore>,
        clock: Arc<dyn Clock>,
        retry: RetryPolicy,
        concurrency: usize,
    ) -> Self {
        Self {
            store,
            clock,
            retry,
            concurrency: concurrency.max(1),
        }
    }

    /// Runs one pass. Only a failed scan is an error.
    pub async fn handle(&self) -> Result<SweepReport, EntitlementError> {
        let now = self.clock.now();
        let lapsed = self
            .retry
            .run("sweep_scan", || self.store.find_lapsed(now))
            .await?;

        let examined = lapsed.len();
        let outcomes: Vec<ItemOutcome> = stream::iter(lapsed)
            .map(|record| self.downgrade_one(record.principal_id, now))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let report = outcomes.into_iter().fold(
            SweepReport {
                examined,
                ..SweepReport::default()
            },
            |mut report, outcome| {
                match outcome {
                    ItemOutcome::Downgraded => report.downgraded += 1,
                    ItemOutcome::Skipped => report.skipped += 1,
                    ItemOutcome::Failed => report.failed += 1,
                }
                report
            },
        );

        tracing::info!(
            examined = report.examined,
            downgraded = report.downgraded,
            skipped = report.skipped,
            failed = report.failed,
            "Expiry sweep finished"
        );
        Ok(report)
    }

    async fn downgrade_one(
        &self,
        principal_id: PrincipalId,
        now: Timestamp,
    ) -> ItemOutcome {
        let result = self
            .retry
            .run("sweep_downgrade", || self.store.downgrade_if_lapsed(&principal_id, now))
            .await;

        match result {
            Ok(true) => {
                tracing::info!(principal_id = %principal_id, "Lapsed entitlement downgraded to free");
                ItemOutcome::Downgraded
            }
            Ok(false) => {
                tracing::debug!(principal_id = %principal_id, "Entitlement renewed before downgrade");
                ItemOutcome::Skipped
            }
            Err(e) => {
                tracing::error!(principal_id = %principal_id, error = %e, "Failed to downgrade lapsed entitlement");
                ItemOutcome::Failed
            }
        }
    }
}
