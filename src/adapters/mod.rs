//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Session validators (JWT, mock)
//! - `checkout` - Hosted checkout link builder
//! - `clock` - System and fixed clocks
//! - `http` - Axum routers and handlers
//! - `memory` - In-memory stores for tests and local runs
//! - `postgres` - PostgreSQL stores
//! - `scheduler` - Background expiry sweep

pub mod auth;
pub mod checkout;
pub mod clock;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod scheduler;

pub use auth::{JwtSessionValidator, MockSessionValidator};
pub use checkout::HostedCheckoutLink;
pub use clock::{FixedClock, SystemClock};
pub use memory::{InMemoryEntitlementStore, InMemoryUsageCounterStore};
pub use postgres::{PostgresEntitlementStore, PostgresUsageCounterStore};
pub use scheduler::{ExpirySweeper, SweepSchedule};
