//! HTTP handlers for payment endpoints.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::IntoResponse;

use super::dto::{CreateSessionRequest, CreateSessionResponse, WebhookAck};
use crate::adapters::http::error::EntitlementApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::{
    CreateCheckoutSessionCommand, CreateCheckoutSessionHandler, GetMyPlanHandler, GetMyPlanQuery,
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler,
};

/// Header carrying the webhook signature unless configured otherwise.
pub const DEFAULT_SIGNATURE_HEADER: &str = "x-signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PaymentsAppState {
    pub webhook_handler: Arc<HandlePaymentWebhookHandler>,
    pub checkout_handler: Arc<CreateCheckoutSessionHandler>,
    pub plan_handler: Arc<GetMyPlanHandler>,
    pub signature_header: HeaderName,
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook
// ════════════════════════════════════════════════════════════════════════════════

/// POST /payments/webhook
///
/// Takes the raw body so the signature is checked over the exact bytes sent.
/// Always answers 200, including when the body cannot be read.
pub async fn handle_payment_webhook(
    State(state): State<PaymentsAppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> impl IntoResponse {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(
                status = %rejection.status(),
                error = %rejection.body_text(),
                "Unreadable webhook body dropped"
            );
            return (StatusCode::OK, Json(WebhookAck::received()));
        }
    };

    let signature = headers
        .get(&state.signature_header)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state
        .webhook_handler
        .handle(HandlePaymentWebhookCommand {
            payload: body.to_vec(),
            signature,
        })
        .await;

    (StatusCode::OK, Json(WebhookAck::received()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Authenticated endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /payments/create-session
pub async fn create_session(
    State(state): State<PaymentsAppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, EntitlementApiError> {
    let session = state
        .checkout_handler
        .handle(CreateCheckoutSessionCommand {
            principal_id: user.id,
            plan: request.plan,
        })
        .await?;

    Ok(Json(CreateSessionResponse::from(session)))
}

/// GET /payments/plan/me
pub async fn get_my_plan(
    State(state): State<PaymentsAppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, EntitlementApiError> {
    let view = state
        .plan_handler
        .handle(GetMyPlanQuery {
            principal_id: user.id,
        })
        .await?;

    Ok(Json(view))
}
