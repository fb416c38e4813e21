//! Authentication types for the domain layer.
//!
//! These types represent an authenticated principal extracted from a bearer
//! token. They have **no external dependencies** - any token issuer can
//! populate them via the `SessionValidator` port.

use super::{Email, PrincipalId};
use thiserror::Error;

/// Authenticated principal extracted from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The unique principal identifier (token subject).
    pub id: PrincipalId,

    /// Principal's email address from the token claims.
    pub email: Email,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: PrincipalId, email: Email) -> Self {
        Self { id, email }
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_user_new_creates_user() {
        let user = AuthenticatedUser::new(
            PrincipalId::new("user-123").unwrap(),
            Email::parse("test@example.com").unwrap(),
        );

        assert_eq!(user.id.as_str(), "user-123");
        assert_eq!(user.email.as_str(), "test@example.com");
    }

    #[test]
    fn only_service_unavailable_is_transient() {
        assert!(AuthError::service_unavailable("down").is_transient());
        assert!(!AuthError::InvalidToken.is_transient());
        assert!(!AuthError::TokenExpired.is_transient());
    }
}
