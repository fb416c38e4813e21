//! Axum router for the usage gate.

use axum::{routing::post, Router};

use super::handlers::{track_usage, UsageAppState};

/// - `POST /usage/track` - Consume one metered action
pub fn usage_routes() -> Router<UsageAppState> {
    Router::new().route("/usage/track", post(track_usage))
}
