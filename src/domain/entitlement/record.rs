//! Entitlement record - the persisted state for one principal.
//!
//! The tier and its expiry live in a single [`Entitlement`] value, so the
//! invariant `tier = periodic <=> expires_at is set` holds for every value in
//! memory. Storage rows are converted through [`Entitlement::from_parts`],
//! which refuses rows that break it.

use serde::Serialize;
use thiserror::Error;

use super::Tier;
use crate::domain::foundation::{DomainError, Email, PrincipalId, Timestamp};

/// A principal's current entitlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entitlement {
    Free,
    Periodic { expires_at: Timestamp },
    Perpetual,
}

/// A stored tier/expiry pair that breaks the entitlement invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tier '{tier}' stored with has_expiry={has_expiry}")]
pub struct InvariantViolation {
    pub tier: Tier,
    pub has_expiry: bool,
}

impl From<InvariantViolation> for DomainError {
    fn from(err: InvariantViolation) -> Self {
        DomainError::corruption(err.to_string())
            .with_detail("tier", err.tier.as_str())
            .with_detail("has_expiry", err.has_expiry.to_string())
    }
}

impl Entitlement {
    /// Rebuilds an entitlement from its stored columns.
    pub fn from_parts(
        tier: Tier,
        expires_at: Option<Timestamp>,
    ) -> Result<Self, InvariantViolation> {
        match (tier, expires_at) {
            (Tier::Free, None) => Ok(Entitlement::Free),
            (Tier::Perpetual, None) => Ok(Entitlement::Perpetual),
            (Tier::Periodic, Some(expires_at)) => Ok(Entitlement::Periodic { expires_at }),
            (tier, expires_at) => Err(InvariantViolation {
                tier,
                has_expiry: expires_at.is_some(),
            }),
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            Entitlement::Free => Tier::Free,
            Entitlement::Periodic { .. } => Tier::Periodic,
            Entitlement::Perpetual => Tier::Perpetual,
        }
    }

    pub fn expires_at(&self) -> Option<Timestamp> {
        match self {
            Entitlement::Periodic { expires_at } => Some(*expires_at),
            _ => None,
        }
    }

    /// Paid access is in effect at `now`.
    ///
    /// A periodic entitlement whose expiry has passed is inactive even before
    /// the sweeper downgrades it.
    pub fn is_active(&self, now: Timestamp) -> bool {
        match self {
            Entitlement::Free => false,
            Entitlement::Periodic { expires_at } => expires_at.is_after(&now),
            Entitlement::Perpetual => true,
        }
    }

    /// Periodic entitlement whose expiry is strictly before `now`.
    pub fn is_lapsed(&self, now: Timestamp) -> bool {
        match self {
            Entitlement::Periodic { expires_at } => expires_at.is_before(&now),
            _ => false,
        }
    }
}

/// Persisted entitlement state for one principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementRecord {
    pub principal_id: PrincipalId,
    pub principal_email: Email,
    pub entitlement: Entitlement,
    pub updated_at: Timestamp,
}

impl EntitlementRecord {
    /// The state every account starts in.
    pub fn new_free(principal_id: PrincipalId, principal_email: Email, now: Timestamp) -> Self {
        Self {
            principal_id,
            principal_email,
            entitlement: Entitlement::Free,
            updated_at: now,
        }
    }

    pub fn tier(&self) -> Tier {
        self.entitlement.tier()
    }

    pub fn expires_at(&self) -> Option<Timestamp> {
        self.entitlement.expires_at()
    }

    pub fn is_active(&self, now: Timestamp) -> bool {
        self.entitlement.is_active(now)
    }

    /// Read-model view used by `GET /payments/plan/me`.
    pub fn plan_view(&self, now: Timestamp) -> PlanView {
        PlanView {
            tier: self.tier(),
            expires_at: self.expires_at(),
            is_active: self.is_active(now),
        }
    }
}

/// What a principal sees about their own plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanView {
    pub tier: Tier,
    pub expires_at: Option<Timestamp>,
    pub is_active: bool,
}
