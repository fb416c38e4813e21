//! Authentication adapters implementing the `SessionValidator` port.
//!
//! - `jwt` - HS256 tokens issued by the account service
//! - `mock` - Test implementation keyed by token string

mod jwt;
mod mock;

pub use jwt::JwtSessionValidator;
pub use mock::MockSessionValidator;
