//! Canonical payment events and the payload normalizer.
//!
//! The provider has sent two payload shapes over time:
//!
//! ```json
//! { "event_type": "payment_succeeded", "customer_email": "...", "product_id": "..." }
//! { "type": "payment.succeeded", "data": { "payment": { "customer": { "email": "..." }, "product_id": "..." } } }
//! ```
//!
//! Each field is read through an ordered list of JSON pointers; the first
//! non-empty string wins. Adding a shape means adding a pointer.

use serde_json::Value;
use thiserror::Error;

use crate::domain::foundation::Email;

const KIND_POINTERS: &[&str] = &["/event_type", "/type"];
const EMAIL_POINTERS: &[&str] = &["/customer_email", "/data/payment/customer/email"];
const PRODUCT_POINTERS: &[&str] = &["/product_id", "/data/payment/product_id"];

/// Event kinds that mean "payment succeeded".
const PAYMENT_SUCCEEDED_KINDS: &[&str] = &["payment_succeeded", "payment.succeeded"];

/// Provider-independent payment event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    PaymentSucceeded {
        customer_email: Email,
        product_id: String,
    },
    /// Any kind this system does not act on. `kind` is `None` when the
    /// payload carried no recognizable kind at all.
    Other { kind: Option<String> },
}

impl PaymentEvent {
    /// Kind label for logging.
    pub fn kind(&self) -> &str {
        match self {
            PaymentEvent::PaymentSucceeded { .. } => PAYMENT_SUCCEEDED_KINDS[0],
            PaymentEvent::Other { kind } => kind.as_deref().unwrap_or("unknown"),
        }
    }
}

/// Payload could not be turned into a canonical event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("payload is not valid JSON: {0}")]
    MalformedPayload(String),

    #[error("payment event is missing '{0}'")]
    MissingField(&'static str),

    #[error("payment event field '{field}' is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Input to the normalizer: raw body bytes or an already-parsed object.
#[derive(Debug, Clone, Copy)]
pub enum PayloadSource<'a> {
    Raw(&'a [u8]),
    Parsed(&'a Value),
}

impl<'a> From<&'a [u8]> for PayloadSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        PayloadSource::Raw(bytes)
    }
}

impl<'a> From<&'a Value> for PayloadSource<'a> {
    fn from(value: &'a Value) -> Self {
        PayloadSource::Parsed(value)
    }
}

/// Normalizes a provider payload.
pub fn normalize<'a>(source: impl Into<PayloadSource<'a>>) -> Result<PaymentEvent, NormalizationError> {
    match source.into() {
        PayloadSource::Raw(bytes) => {
            let value: Value = serde_json::from_slice(bytes)
                .map_err(|e| NormalizationError::MalformedPayload(e.to_string()))?;
            normalize_value(&value)
        }
        PayloadSource::Parsed(value) => normalize_value(value),
    }
}

fn normalize_value(value: &Value) -> Result<PaymentEvent, NormalizationError> {
    let kind = first_string(value, KIND_POINTERS);

    let is_payment = kind
        .as_deref()
        .map(|k| PAYMENT_SUCCEEDED_KINDS.contains(&k))
        .unwrap_or(false);
    if !is_payment {
        return Ok(PaymentEvent::Other { kind });
    }

    let email = first_string(value, EMAIL_POINTERS)
        .ok_or(NormalizationError::MissingField("customer_email"))?;
    let customer_email = Email::parse(&email).map_err(|e| NormalizationError::InvalidField {
        field: "customer_email",
        reason: e.to_string(),
    })?;
    let product_id = first_string(value, PRODUCT_POINTERS)
        .ok_or(NormalizationError::MissingField("product_id"))?;

    Ok(PaymentEvent::PaymentSucceeded {
        customer_email,
        product_id,
    })
}

fn first_string(value: &Value, pointers: &[&str]) -> Option<String> {
    pointers.iter().find_map(|pointer| {
        value
            .pointer(pointer)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn succeeded(email: &str, product: &str) -> PaymentEvent {
        PaymentEvent::PaymentSucceeded {
            customer_email: Email::parse(email).unwrap(),
            product_id: product.to_string(),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Payload shapes
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn flat_shape_from_raw_bytes() {
        let body = br#"{"event_type":"payment_succeeded","customer_email":"a@x.com","product_id":"prod_yearly"}"#;
        assert_eq!(normalize(&body[..]).unwrap(), succeeded("a@x.com", "prod_yearly"));
    }

    #[test]
    fn nested_shape_from_parsed_value() {
        let value = json!({
            "type": "payment.succeeded",
            "data": { "payment": { "customer": { "email": "B@X.com" }, "product_id": "prod_lifetime" } }
        });
        assert_eq!(normalize(&value).unwrap(), succeeded("b@x.com", "prod_lifetime"));
    }

    #[test]
    fn flat_fields_win_over_nested() {
        let value = json!({
            "event_type": "payment_succeeded",
            "customer_email": "flat@x.com",
            "product_id": "flat_prod",
            "data": { "payment": { "customer": { "email": "nested@x.com" }, "product_id": "nested_prod" } }
        });
        assert_eq!(normalize(&value).unwrap(), succeeded("flat@x.com", "flat_prod"));
    }

    #[test]
    fn empty_flat_field_falls_through_to_nested() {
        let value = json!({
            "event_type": "payment_succeeded",
            "customer_email": "",
            "product_id": "prod_yearly",
            "data": { "payment": { "customer": { "email": "n@x.com" } } }
        });
        assert_eq!(normalize(&value).unwrap(), succeeded("n@x.com", "prod_yearly"));
    }

    // ══════════════════════════════════════════════════════════════
    // Non-payment kinds
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn other_kind_is_not_an_error() {
        let value = json!({ "event_type": "refund_created", "customer_email": "a@x.com" });
        assert_eq!(
            normalize(&value).unwrap(),
            PaymentEvent::Other { kind: Some("refund_created".to_string()) }
        );
    }

    #[test]
    fn absent_kind_is_other() {
        let event = normalize(&json!({ "hello": "world" })).unwrap();
        assert_eq!(event, PaymentEvent::Other { kind: None });
        assert_eq!(event.kind(), "unknown");
    }

    #[test]
    fn non_object_json_is_other() {
        assert_eq!(normalize(&b"[1,2,3]"[..]).unwrap(), PaymentEvent::Other { kind: None });
    }

    // ══════════════════════════════════════════════════════════════
    // Errors
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn malformed_json_is_an_error() {
        let err = normalize(&b"{not json"[..]).unwrap_err();
        assert!(matches!(err, NormalizationError::MalformedPayload(_)));
    }

    #[test]
    fn payment_without_email_is_missing_field() {
        let value = json!({ "event_type": "payment_succeeded", "product_id": "prod_yearly" });
        assert_eq!(
            normalize(&value).unwrap_err(),
            NormalizationError::MissingField("customer_email")
        );
    }

    #[test]
    fn payment_without_product_is_missing_field() {
        let value = json!({ "event_type": "payment_succeeded", "customer_email": "a@x.com" });
        assert_eq!(
            normalize(&value).unwrap_err(),
            NormalizationError::MissingField("product_id")
        );
    }

    #[test]
    fn payment_with_bad_email_is_invalid_field() {
        let value = json!({
            "event_type": "payment_succeeded",
            "customer_email": "not-an-email",
            "product_id": "prod_yearly"
        });
        assert!(matches!(
            normalize(&value).unwrap_err(),
            NormalizationError::InvalidField { field: "customer_email", .. }
        ));
    }

    #[test]
    fn non_string_fields_are_ignored() {
        let value = json!({
            "event_type": "payment_succeeded",
            "customer_email": 42,
            "product_id": "prod_yearly"
        });
        assert_eq!(
            normalize(&value).unwrap_err(),
            NormalizationError::MissingField("customer_email")
        );
    }
}
