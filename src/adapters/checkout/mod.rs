//! Checkout provider adapters.

mod hosted_link;

pub use hosted_link::HostedCheckoutLink;
