//! Entitlement domain module.
//!
//! Tier state per principal, the plan catalog, and usage gate outcomes.
//!
//! # Module Structure
//!
//! - `tier` - Tier levels (free / periodic / perpetual)
//! - `record` - Entitlement value and persisted record
//! - `plan` - Product catalog and expiry policy
//! - `usage` - Free quota decisions
//! - `errors` - Handler-facing error type

mod errors;
mod plan;
mod record;
mod tier;
mod usage;

pub use errors::EntitlementError;
pub use plan::{
    ExpiryPolicy, PaidPlan, PlanCatalog, ResolvedPlan, UnknownProduct, PERIODIC_TERM_DAYS,
};
pub use record::{Entitlement, EntitlementRecord, InvariantViolation, PlanView};
pub use tier::Tier;
pub use usage::{DenialReason, FreeQuota, Remaining, UsageDecision, DEFAULT_FREE_QUOTA};
