//! HTTP adapters - REST API implementations.
//!
//! Each feature has its own router and state; [`app_router`] composes them
//! with the cross-cutting layers.

pub mod error;
pub mod middleware;
pub mod payments;
pub mod usage;

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use error::{EntitlementApiError, ErrorResponse};
pub use middleware::{auth_middleware, AuthState, RequireAuth};
pub use payments::{payment_routes, webhook_routes, PaymentsAppState};
pub use usage::{usage_routes, UsageAppState};

/// Cross-cutting HTTP settings.
#[derive(Debug, Clone)]
pub struct RouterSettings {
    /// Upper bound for authenticated requests.
    pub request_timeout: Duration,
    /// Origins allowed by CORS. Empty means same-origin only.
    pub cors_origins: Vec<HeaderValue>,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
        }
    }
}

/// Builds the full application router.
///
/// The webhook sits outside the auth and timeout layers: it is authenticated
/// by signature and bounds its own work so it can always answer 200.
pub fn app_router(
    payments: PaymentsAppState,
    usage: UsageAppState,
    validator: AuthState,
    settings: &RouterSettings,
) -> Router {
    let authenticated = Router::new()
        .merge(payment_routes().with_state(payments.clone()))
        .merge(usage_routes().with_state(usage))
        .layer(axum::middleware::from_fn_with_state(validator, auth_middleware))
        .layer(TimeoutLayer::new(settings.request_timeout));

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(settings.cors_origins.clone()))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .merge(webhook_routes().with_state(payments))
        .merge(authenticated)
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn health() -> &'static str {
    "OK"
}
