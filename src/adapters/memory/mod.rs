//! In-memory storage adapters for tests and database-less runs.

mod entitlement_store;
mod usage_counter_store;

pub use entitlement_store::InMemoryEntitlementStore;
pub use usage_counter_store::InMemoryUsageCounterStore;
