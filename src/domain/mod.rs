//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, auth)
//! - `entitlement` - Tier state, plan catalog, and usage quota
//! - `payment` - Webhook signature verification and payload normalization

pub mod entitlement;
pub mod foundation;
pub mod payment;
