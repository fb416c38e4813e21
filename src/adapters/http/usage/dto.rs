//! Response bodies for the usage gate.

use axum::http::StatusCode;
use serde::Serialize;

use crate::domain::entitlement::{DenialReason, Remaining, UsageDecision};

/// `{allowed: true, remaining}` or `{allowed: false, reason}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TrackUsageResponse {
    Allowed { allowed: bool, remaining: Remaining },
    Denied { allowed: bool, reason: DenialReason },
}

impl TrackUsageResponse {
    pub fn status(&self) -> StatusCode {
        match self {
            TrackUsageResponse::Allowed { .. } => StatusCode::OK,
            TrackUsageResponse::Denied { .. } => StatusCode::FORBIDDEN,
        }
    }
}

impl From<UsageDecision> for TrackUsageResponse {
    fn from(decision: UsageDecision) -> Self {
        match decision {
            UsageDecision::Allowed { remaining } => TrackUsageResponse::Allowed {
                allowed: true,
                remaining,
            },
            UsageDecision::Denied { reason } => TrackUsageResponse::Denied {
                allowed: false,
                reason,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn allowed_limited_serializes_remaining_number() {
        let body = TrackUsageResponse::from(UsageDecision::Allowed {
            remaining: Remaining::Limited(3),
        });
        assert_eq!(body.status(), StatusCode::OK);
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "allowed": true, "remaining": 3 }));
    }

    #[test]
    fn allowed_unlimited_serializes_string() {
        let body = TrackUsageResponse::from(UsageDecision::Allowed {
            remaining: Remaining::Unlimited,
        });
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "allowed": true, "remaining": "unlimited" })
        );
    }

    #[test]
    fn denied_is_forbidden_with_reason() {
        let body = TrackUsageResponse::from(UsageDecision::Denied {
            reason: DenialReason::QuotaExceeded,
        });
        assert_eq!(body.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "allowed": false, "reason": "QUOTA_EXCEEDED" })
        );
    }
}
