//! Axum routers for payment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_session, get_my_plan, handle_payment_webhook, PaymentsAppState};

/// Routes that require a bearer token.
///
/// - `POST /payments/create-session` - Start a hosted checkout
/// - `GET /payments/plan/me` - Current plan of the caller
pub fn payment_routes() -> Router<PaymentsAppState> {
    Router::new()
        .route("/payments/create-session", post(create_session))
        .route("/payments/plan/me", get(get_my_plan))
}

/// Provider webhook. Authenticated by signature, not by token.
///
/// - `POST /payments/webhook`
pub fn webhook_routes() -> Router<PaymentsAppState> {
    Router::new().route("/payments/webhook", post(handle_payment_webhook))
}
