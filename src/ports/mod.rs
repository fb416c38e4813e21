//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `EntitlementStore` - Entitlement records, shared by all writers
//! - `UsageCounterStore` - Free-tier usage counters
//!
//! ## Integration Ports
//!
//! - `CheckoutProvider` - Hosted checkout sessions
//! - `SessionValidator` - Bearer token validation
//! - `Clock` - Current time

mod checkout_provider;
mod clock;
mod entitlement_store;
mod session_validator;
mod usage_counter_store;

pub use checkout_provider::{CheckoutError, CheckoutProvider, CheckoutRequest, CheckoutSession};
pub use clock::Clock;
pub use entitlement_store::EntitlementStore;
pub use session_validator::SessionValidator;
pub use usage_counter_store::UsageCounterStore;
