//! Usage gate HTTP endpoint.

pub mod dto;
mod handlers;
mod routes;

pub use handlers::UsageAppState;
pub use routes::usage_routes;
