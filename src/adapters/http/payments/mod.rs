//! Payment HTTP endpoints: provider webhook, checkout, and plan lookup.

pub mod dto;
mod handlers;
mod routes;

pub use handlers::{PaymentsAppState, DEFAULT_SIGNATURE_HEADER};
pub use routes::{payment_routes, webhook_routes};
