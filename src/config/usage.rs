//! Usage gate configuration

use serde::Deserialize;

use crate::domain::entitlement::{FreeQuota, DEFAULT_FREE_QUOTA};

/// Free-tier usage settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageConfig {
    /// Successful actions allowed on the free tier. Zero denies every call.
    #[serde(default = "default_free_quota")]
    pub free_quota: u32,
}

impl UsageConfig {
    pub fn quota(&self) -> FreeQuota {
        FreeQuota::new(self.free_quota)
    }
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            free_quota: default_free_quota(),
        }
    }
}

fn default_free_quota() -> u32 {
    DEFAULT_FREE_QUOTA
}
