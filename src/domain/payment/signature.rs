//! Payment webhook signature verification.
//!
//! The provider signs the exact request body with HMAC-SHA256 and sends the
//! hex digest in a header. Verification must run over the raw bytes as they
//! arrived; re-serializing parsed JSON changes the digest.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Outcome of checking a webhook signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    /// Signature matches the body.
    Valid,
    /// No secret configured; every body is accepted (open mode).
    Unconfigured,
    /// Secret configured but the request carried no signature.
    Missing,
    /// Signature does not match the body.
    Invalid,
}

impl SignatureCheck {
    /// Whether processing may continue.
    pub fn is_accepted(&self) -> bool {
        matches!(self, SignatureCheck::Valid | SignatureCheck::Unconfigured)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureCheck::Valid => "valid",
            SignatureCheck::Unconfigured => "unconfigured",
            SignatureCheck::Missing => "missing",
            SignatureCheck::Invalid => "invalid",
        }
    }
}

/// Verifier bound to the shared webhook secret.
///
/// Built once at startup from configuration.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: Option<SecretString>,
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl SignatureVerifier {
    pub fn new(secret: Option<SecretString>) -> Self {
        // An empty secret would make every signature trivially forgeable.
        let secret = secret.filter(|s| !s.expose_secret().is_empty());
        Self { secret }
    }

    /// Verifier with no secret. Accepts everything.
    pub fn unconfigured() -> Self {
        Self { secret: None }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Checks `provided` against the HMAC of `body`.
    ///
    /// The provided signature is trimmed and compared case-insensitively as
    /// hex. Comparison is constant-time once lengths match.
    pub fn check(&self, body: &[u8], provided: Option<&str>) -> SignatureCheck {
        let Some(secret) = &self.secret else {
            return SignatureCheck::Unconfigured;
        };

        let provided = match provided.map(str::trim) {
            Some(sig) if !sig.is_empty() => sig.to_ascii_lowercase(),
            _ => return SignatureCheck::Missing,
        };

        let Some(expected) = compute_signature(secret.expose_secret().as_bytes(), body) else {
            return SignatureCheck::Invalid;
        };

        if constant_time_compare(expected.as_bytes(), provided.as_bytes()) {
            SignatureCheck::Valid
        } else {
            SignatureCheck::Invalid
        }
    }
}

/// Boolean form of the verification contract.
///
/// - no secret: `true` (caller is expected to warn)
/// - secret but no signature: `false`
/// - otherwise: HMAC-SHA256 hex of `body` equals `provided`
pub fn verify(body: &[u8], provided: Option<&str>, secret: Option<&str>) -> bool {
    SignatureVerifier::new(secret.map(|s| SecretString::new(s.to_string())))
        .check(body, provided)
        .is_accepted()
}

/// Lower-case hex HMAC-SHA256 of `body` under `secret`.
pub fn sign(secret: &str, body: &[u8]) -> String {
    compute_signature(secret.as_bytes(), body).unwrap_or_default()
}

fn compute_signature(key: &[u8], body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(key).ok()?;
    mac.update(body);
    Some(hex::encode(mac.finalize().into_bytes()))
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "whsec_prompt_market_test";
    const BODY: &[u8] = br#"{"event_type":"payment_succeeded","customer_email":"a@x.com","product_id":"prod_yearly"}"#;

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new(Some(SecretString::new(SECRET.to_string())))
    }

    // ══════════════════════════════════════════════════════════════
    // Check outcomes
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn valid_signature_is_accepted() {
        let sig = sign(SECRET, BODY);
        assert_eq!(verifier().check(BODY, Some(&sig)), SignatureCheck::Valid);
    }

    #[test]
    fn upper_case_and_padded_signature_is_accepted() {
        let sig = format!("  {}\n", sign(SECRET, BODY).to_uppercase());
        assert_eq!(verifier().check(BODY, Some(&sig)), SignatureCheck::Valid);
    }

    #[test]
    fn missing_signature_is_rejected() {
        assert_eq!(verifier().check(BODY, None), SignatureCheck::Missing);
        assert_eq!(verifier().check(BODY, Some("   ")), SignatureCheck::Missing);
        assert!(!SignatureCheck::Missing.is_accepted());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let sig = sign("other_secret", BODY);
        assert_eq!(verifier().check(BODY, Some(&sig)), SignatureCheck::Invalid);
    }

    #[test]
    fn truncated_signature_is_rejected() {
        let sig = sign(SECRET, BODY);
        assert_eq!(verifier().check(BODY, Some(&sig[..10])), SignatureCheck::Invalid);
    }

    #[test]
    fn unconfigured_verifier_accepts_anything() {
        let v = SignatureVerifier::unconfigured();
        assert!(!v.is_configured());
        assert_eq!(v.check(BODY, None), SignatureCheck::Unconfigured);
        assert!(SignatureCheck::Unconfigured.is_accepted());
    }

    #[test]
    fn empty_secret_counts_as_unconfigured() {
        let v = SignatureVerifier::new(Some(SecretString::new(String::new())));
        assert!(!v.is_configured());
    }

    #[test]
    fn debug_output_does_not_leak_secret() {
        let out = format!("{:?}", verifier());
        assert!(!out.contains(SECRET));
    }

    // ══════════════════════════════════════════════════════════════
    // Boolean contract
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_follows_boolean_contract() {
        let sig = sign(SECRET, BODY);
        assert!(verify(BODY, None, None));
        assert!(verify(BODY, Some("garbage"), None));
        assert!(!verify(BODY, None, Some(SECRET)));
        assert!(verify(BODY, Some(&sig), Some(SECRET)));
        assert!(!verify(b"{}", Some(&sig), Some(SECRET)));
    }

    #[test]
    fn sign_produces_64_hex_chars() {
        let sig = sign(SECRET, BODY);
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    proptest! {
        #[test]
        fn any_single_byte_change_is_rejected(index in 0usize..BODY.len(), flip in 1u8..=255) {
            let sig = sign(SECRET, BODY);
            let mut tampered = BODY.to_vec();
            tampered[index] ^= flip;
            prop_assert_eq!(verifier().check(&tampered, Some(&sig)), SignatureCheck::Invalid);
        }
    }
}
