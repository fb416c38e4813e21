//! Entitlement-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | PrincipalNotFound | 404 |
//! | ValidationFailed | 400 |
//! | CheckoutFailed | 502 |
//! | Unavailable | 503 |
//! | DataCorruption | 500 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, PrincipalId};

/// Errors surfaced by entitlement command and query handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    /// No entitlement record exists for this principal.
    PrincipalNotFound(PrincipalId),

    /// Request input failed validation.
    ValidationFailed { field: String, message: String },

    /// A stored record violates the tier/expiry invariant.
    DataCorruption(String),

    /// The record store stayed unreachable after bounded retries.
    Unavailable(String),

    /// The checkout provider could not produce a session.
    CheckoutFailed(String),

    /// Any other infrastructure failure.
    Infrastructure(String),
}

impl EntitlementError {
    pub fn principal_not_found(id: PrincipalId) -> Self {
        EntitlementError::PrincipalNotFound(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EntitlementError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn checkout_failed(message: impl Into<String>) -> Self {
        EntitlementError::CheckoutFailed(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        EntitlementError::Infrastructure(message.into())
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            EntitlementError::PrincipalNotFound(_) => "PRINCIPAL_NOT_FOUND",
            EntitlementError::ValidationFailed { .. } => "VALIDATION_FAILED",
            EntitlementError::DataCorruption(_) => "DATA_CORRUPTION",
            EntitlementError::Unavailable(_) => "SERVICE_UNAVAILABLE",
            EntitlementError::CheckoutFailed(_) => "CHECKOUT_FAILED",
            EntitlementError::Infrastructure(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            EntitlementError::PrincipalNotFound(id) => {
                format!("No entitlement found for principal: {}", id)
            }
            EntitlementError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            // Internal details stay in logs.
            EntitlementError::DataCorruption(_) | EntitlementError::Infrastructure(_) => {
                "Internal error".to_string()
            }
            EntitlementError::Unavailable(_) => "Service temporarily unavailable".to_string(),
            EntitlementError::CheckoutFailed(_) => "Could not start checkout".to_string(),
        }
    }
}

impl std::fmt::Display for EntitlementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntitlementError::DataCorruption(detail)
            | EntitlementError::Unavailable(detail)
            | EntitlementError::CheckoutFailed(detail)
            | EntitlementError::Infrastructure(detail) => {
                write!(f, "{}: {}", self.code(), detail)
            }
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for EntitlementError {}

impl From<DomainError> for EntitlementError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => EntitlementError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::DataCorruption => EntitlementError::DataCorruption(err.to_string()),
            ErrorCode::StoreUnavailable => EntitlementError::Unavailable(err.to_string()),
            _ => EntitlementError::Infrastructure(err.to_string()),
        }
    }
}
