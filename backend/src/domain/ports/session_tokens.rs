//! Driven port for signing and validating session tokens.

use crate::domain::{IssuedToken, SessionClaims, TokenError, UserAccount};

use super::define_port_error;

define_port_error! {
    /// Errors raised while signing a new token.
    pub enum TokenIssueError {
        /// The signing backend rejected the claims or key.
        Signing { message: String } => "failed to sign session token: {message}",
    }
}

/// Port for issuing tokens at login and validating them per request.
#[cfg_attr(test, mockall::automock)]
pub trait SessionTokens: Send + Sync {
    /// Sign a token asserting the account's identity.
    fn issue(&self, account: &UserAccount) -> Result<IssuedToken, TokenIssueError>;

    /// Verify a presented token and return its claims.
    fn validate(&self, token: &str) -> Result<SessionClaims, TokenError>;
}
