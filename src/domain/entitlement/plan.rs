//! Plan resolution - maps provider product identifiers to tiers.
//!
//! The catalog holds exactly two products, one per paid tier. It is built
//! once from configuration and shared read-only; lookups never touch the
//! environment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Entitlement, Tier};
use crate::domain::foundation::Timestamp;

/// Length of a periodic entitlement.
pub const PERIODIC_TERM_DAYS: i64 = 365;

/// How the expiry of a newly applied plan is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// No expiry.
    Never,
    /// Expires a fixed number of days after the moment the plan is applied.
    DaysFromApply(i64),
}

impl ExpiryPolicy {
    /// Expiry for a plan applied at `applied_at`.
    ///
    /// Always measured from the apply time, never from a previous expiry, so
    /// a replayed payment moves expiry forward from the replay instead of
    /// stacking another term on top.
    pub fn expires_at(&self, applied_at: Timestamp) -> Option<Timestamp> {
        match self {
            ExpiryPolicy::Never => None,
            ExpiryPolicy::DaysFromApply(days) => Some(applied_at.add_days(*days)),
        }
    }
}

/// Target state for a paid product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPlan {
    pub tier: Tier,
    pub expiry_policy: ExpiryPolicy,
}

impl ResolvedPlan {
    pub fn periodic() -> Self {
        Self {
            tier: Tier::Periodic,
            expiry_policy: ExpiryPolicy::DaysFromApply(PERIODIC_TERM_DAYS),
        }
    }

    pub fn perpetual() -> Self {
        Self {
            tier: Tier::Perpetual,
            expiry_policy: ExpiryPolicy::Never,
        }
    }

    /// The entitlement this plan grants when applied at `now`.
    pub fn entitlement_at(&self, now: Timestamp) -> Entitlement {
        match (self.tier, self.expiry_policy.expires_at(now)) {
            (Tier::Periodic, Some(expires_at)) => Entitlement::Periodic { expires_at },
            (Tier::Perpetual, _) => Entitlement::Perpetual,
            // Catalog only builds periodic+DaysFromApply and perpetual+Never.
            _ => Entitlement::Free,
        }
    }
}

/// A paid plan a principal can check out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaidPlan {
    Periodic,
    Perpetual,
}

impl PaidPlan {
    pub fn tier(&self) -> Tier {
        match self {
            PaidPlan::Periodic => Tier::Periodic,
            PaidPlan::Perpetual => Tier::Perpetual,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.tier().as_str()
    }
}

/// The product identifier is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown product: {0}")]
pub struct UnknownProduct(pub String);

/// Static two-entry product table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanCatalog {
    periodic_product_id: String,
    perpetual_product_id: String,
}

impl PlanCatalog {
    pub fn new(
        periodic_product_id: impl Into<String>,
        perpetual_product_id: impl Into<String>,
    ) -> Self {
        Self {
            periodic_product_id: periodic_product_id.into(),
            perpetual_product_id: perpetual_product_id.into(),
        }
    }

    /// Resolves a provider product id to its plan.
    ///
    /// Unknown ids are an expected condition (products not yet wired up);
    /// callers log and drop the event.
    pub fn resolve(&self, product_id: &str) -> Result<ResolvedPlan, UnknownProduct> {
        let product_id = product_id.trim();
        if product_id == self.periodic_product_id {
            Ok(ResolvedPlan::periodic())
        } else if product_id == self.perpetual_product_id {
            Ok(ResolvedPlan::perpetual())
        } else {
            Err(UnknownProduct(product_id.to_string()))
        }
    }

    /// Product id to sell for a paid plan.
    pub fn product_for(&self, plan: PaidPlan) -> &str {
        match plan {
            PaidPlan::Periodic => &self.periodic_product_id,
            PaidPlan::Perpetual => &self.perpetual_product_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> PlanCatalog {
        PlanCatalog::new("prod_yearly", "prod_lifetime")
    }

    #[test]
    fn resolves_periodic_product() {
        let plan = catalog().resolve("prod_yearly").unwrap();
        assert_eq!(plan.tier, Tier::Periodic);
        assert_eq!(plan.expiry_policy, ExpiryPolicy::DaysFromApply(365));
    }

    #[test]
    fn resolves_perpetual_product() {
        let plan = catalog().resolve("prod_lifetime").unwrap();
        assert_eq!(plan.tier, Tier::Perpetual);
        assert_eq!(plan.expiry_policy, ExpiryPolicy::Never);
    }

    #[test]
    fn unknown_product_is_an_error_value() {
        let err = catalog().resolve("prod_new_thing").unwrap_err();
        assert_eq!(err, UnknownProduct("prod_new_thing".to_string()));
        assert_eq!(err.to_string(), "unknown product: prod_new_thing");
    }

    #[test]
    fn periodic_expiry_is_measured_from_apply_time() {
        let applied = Timestamp::now();
        let e = ResolvedPlan::periodic().entitlement_at(applied);
        assert_eq!(e.expires_at(), Some(applied.add_days(PERIODIC_TERM_DAYS)));
    }

    #[test]
    fn perpetual_never_expires() {
        let e = ResolvedPlan::perpetual().entitlement_at(Timestamp::now());
        assert_eq!(e, Entitlement::Perpetual);
    }

    #[test]
    fn product_for_is_inverse_of_resolve() {
        let c = catalog();
        for plan in [PaidPlan::Periodic, PaidPlan::Perpetual] {
            assert_eq!(c.resolve(c.product_for(plan)).unwrap().tier, plan.tier());
        }
    }

    #[test]
    fn paid_plan_rejects_free() {
        let plan: Result<PaidPlan, _> = serde_json::from_str("\"free\"");
        assert!(plan.is_err());
        let plan: PaidPlan = serde_json::from_str("\"perpetual\"").unwrap();
        assert_eq!(plan, PaidPlan::Perpetual);
    }
}
