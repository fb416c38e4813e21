//! Daily expiry sweep.
//!
//! Long-lived task that sleeps until the configured UTC hour, runs one sweep,
//! and repeats. The shutdown signal is only observed while sleeping, so a
//! sweep that has started always finishes.
//!
//! # Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `hour_utc` | 3 | Hour of day (UTC) the sweep starts |
//! | `run_on_startup` | true | Sweep once immediately when the task starts |

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use tokio::sync::watch;

use crate::application::handlers::{SweepExpiredHandler, SweepReport};
use crate::ports::Clock;

/// When the sweep fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSchedule {
    pub hour_utc: u32,
    pub run_on_startup: bool,
}

impl SweepSchedule {
    pub fn daily_at(hour_utc: u32) -> Self {
        Self {
            hour_utc: hour_utc.min(23),
            run_on_startup: true,
        }
    }

    /// First trigger strictly after `now`.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let at = NaiveTime::from_hms_opt(self.hour_utc, 0, 0).unwrap_or_default();
        let today = Utc.from_utc_datetime(&now.date_naive().and_time(at));
        if today > now {
            today
        } else {
            today + chrono::Duration::days(1)
        }
    }
}

impl Default for SweepSchedule {
    fn default() -> Self {
        Self::daily_at(3)
    }
}

pub struct ExpirySweeper {
    handler: Arc<SweepExpiredHandler>,
    clock: Arc<dyn Clock>,
    schedule: SweepSchedule,
}

impl ExpirySweeper {
    pub fn new(
        handler: Arc<SweepExpiredHandler>,
        clock: Arc<dyn Clock>,
        schedule: SweepSchedule,
    ) -> Self {
        Self {
            handler,
            clock,
            schedule,
        }
    }

    /// Runs until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        if self.schedule.run_on_startup && !*shutdown.borrow() {
            self.run_once().await;
        }

        loop {
            let now = *self.clock.now().as_datetime();
            let next = self.schedule.next_run_after(now);
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            tracing::info!(next_run = %next, "Next expiry sweep scheduled");

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Expiry sweeper stopped");
                        return;
                    }
                }
                _ = tokio::time::sleep(wait) => {
                    self.run_once().await;
                }
            }
        }
    }

    /// One sweep; a failed scan is logged and retried at the next trigger.
    pub async fn run_once(&self) -> Option<SweepReport> {
        match self.handler.handle().await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!(error = %e, "Expiry sweep failed");
                None
            }
        }
    }
}
