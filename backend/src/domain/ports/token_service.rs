//! Port for issuing and verifying identity tokens.
use crate::domain::{Identity, IssuedToken, TokenClaims};

use super::define_port_error;

define_port_error! {
    /// Failures raised by token adapters.
    pub enum TokenServiceError {
        /// The token is malformed, badly signed, or expired.
        Invalid { message: String } => "token rejected: {message}",
        /// A token could not be produced.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Issues and verifies signed, time-limited identity tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a token for `identity`.
    fn issue(&self, identity: &Identity) -> Result<IssuedToken, TokenServiceError>;

    /// Verify `token` and return its claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenServiceError>;
}
