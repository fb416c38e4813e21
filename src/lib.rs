//! Prompt Market - Subscription and entitlement lifecycle engine
//!
//! Tracks each principal's tier (free, periodic, perpetual), applies signed
//! payment notifications, meters free-tier usage and downgrades lapsed
//! periodic entitlements.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
