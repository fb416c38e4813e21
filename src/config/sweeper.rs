//! Expiry sweeper configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::scheduler::SweepSchedule;

#[derive(Debug, Clone, Deserialize)]
pub struct SweeperConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// UTC hour the daily sweep starts
    #[serde(default = "default_hour_utc")]
    pub hour_utc: u32,

    /// Downgrades in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Sweep once at startup to catch runs missed while down
    #[serde(default = "default_enabled")]
    pub run_on_startup: bool,
}

impl SweeperConfig {
    pub fn schedule(&self) -> SweepSchedule {
        SweepSchedule {
            hour_utc: self.hour_utc,
            run_on_startup: self.run_on_startup,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.hour_utc > 23 {
            return Err(ValidationError::InvalidSweepHour);
        }
        if self.concurrency == 0 || self.concurrency > 64 {
            return Err(ValidationError::InvalidSweepConcurrency);
        }
        Ok(())
    }
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            hour_utc: default_hour_utc(),
            concurrency: default_concurrency(),
            run_on_startup: default_enabled(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_hour_utc() -> u32 {
    3
}

fn default_concurrency() -> usize {
    8
}
