//! HTTP handler for the usage gate.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::response::IntoResponse;

use super::dto::TrackUsageResponse;
use crate::adapters::http::error::EntitlementApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::{CheckAndConsumeCommand, CheckAndConsumeHandler};

#[derive(Clone)]
pub struct UsageAppState {
    pub gate: Arc<CheckAndConsumeHandler>,
}

/// POST /usage/track
pub async fn track_usage(
    State(state): State<UsageAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, EntitlementApiError> {
    let decision = state
        .gate
        .handle(CheckAndConsumeCommand {
            principal_id: user.id,
        })
        .await?;

    let body = TrackUsageResponse::from(decision);
    Ok((body.status(), Json(body)))
}
