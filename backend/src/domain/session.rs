//! Session claims carried by signed bearer tokens.

use chrono::{DateTime, Utc};

use super::user::{EmailAddress, UserId, Username};

/// Identity asserted by a validated session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub subject: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Freshly signed token together with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Reasons a presented token is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token could not be parsed or its signature did not verify.
    #[error("session token is malformed")]
    Malformed,
    /// The signature verified but the expiry has passed.
    #[error("session token has expired")]
    Expired,
    /// The header names a signing algorithm other than the one the server uses.
    #[error("session token uses an unexpected signing algorithm")]
    WrongAlgorithm,
}
