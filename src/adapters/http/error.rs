//! API error mapping shared by the entitlement routers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::entitlement::EntitlementError;

/// Error body: `{ "code": ..., "message": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Wraps [`EntitlementError`] so handlers can use `?`.
#[derive(Debug)]
pub struct EntitlementApiError(pub EntitlementError);

impl From<EntitlementError> for EntitlementApiError {
    fn from(err: EntitlementError) -> Self {
        Self(err)
    }
}

impl EntitlementApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            EntitlementError::PrincipalNotFound(_) => StatusCode::NOT_FOUND,
            EntitlementError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            EntitlementError::CheckoutFailed(_) => StatusCode::BAD_GATEWAY,
            EntitlementError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            EntitlementError::DataCorruption(_) | EntitlementError::Infrastructure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for EntitlementApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.0.code(), error = %self.0, "Request failed");
        }
        let body = ErrorResponse::new(self.0.code(), self.0.message());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PrincipalId;

    #[test]
    fn maps_errors_to_status_codes() {
        let cases = [
            (
                EntitlementError::principal_not_found(PrincipalId::new("p").unwrap()),
                StatusCode::NOT_FOUND,
            ),
            (EntitlementError::validation("plan", "bad"), StatusCode::BAD_REQUEST),
            (EntitlementError::Unavailable("db".into()), StatusCode::SERVICE_UNAVAILABLE),
            (EntitlementError::DataCorruption("row".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (EntitlementError::checkout_failed("down"), StatusCode::BAD_GATEWAY),
        ];
        for (err, status) in cases {
            assert_eq!(EntitlementApiError(err).status(), status);
        }
    }

    #[test]
    fn response_uses_error_code() {
        let response = EntitlementApiError(EntitlementError::principal_not_found(
            PrincipalId::new("p").unwrap(),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
