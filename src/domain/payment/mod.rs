//! Inbound payment notifications: signature checks and payload normalization.

mod event;
mod signature;

pub use event::{normalize, NormalizationError, PayloadSource, PaymentEvent};
pub use signature::{sign, verify, SignatureCheck, SignatureVerifier};
