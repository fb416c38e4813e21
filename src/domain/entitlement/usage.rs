//! Usage gate outcomes for metered (free tier) actions.

use serde::{Serialize, Serializer};

/// Default number of metered actions a free principal may perform.
pub const DEFAULT_FREE_QUOTA: u32 = 10;

/// Remaining allowance after an allowed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Limited(u32),
    Unlimited,
}

impl Serialize for Remaining {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Remaining::Limited(n) => serializer.serialize_u32(*n),
            Remaining::Unlimited => serializer.serialize_str("unlimited"),
        }
    }
}

/// Why a metered action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenialReason {
    QuotaExceeded,
}

/// Result of a check-and-consume call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageDecision {
    Allowed { remaining: Remaining },
    Denied { reason: DenialReason },
}

impl UsageDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, UsageDecision::Allowed { .. })
    }
}

/// Fixed quota for the free tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeQuota {
    limit: u32,
}

impl FreeQuota {
    pub fn new(limit: u32) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Decision for the outcome of an atomic conditional increment.
    ///
    /// `new_count` is the post-increment value, or `None` when the store
    /// refused to increment because the counter had already reached the
    /// limit.
    pub fn decide(&self, new_count: Option<u32>) -> UsageDecision {
        match new_count {
            Some(count) if count <= self.limit => UsageDecision::Allowed {
                remaining: Remaining::Limited(self.limit - count),
            },
            _ => UsageDecision::Denied {
                reason: DenialReason::QuotaExceeded,
            },
        }
    }
}

impl Default for FreeQuota {
    fn default() -> Self {
        Self::new(DEFAULT_FREE_QUOTA)
    }
}
