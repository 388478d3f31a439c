//! Driving port for registration and login.

use async_trait::async_trait;

use crate::domain::{Error, IssuedToken, LoginCredentials, Registration, UserId};

/// Use-cases for creating accounts and exchanging credentials for tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account; a taken email yields [`crate::domain::ErrorCode::Conflict`].
    async fn register(&self, registration: Registration) -> Result<UserId, Error>;

    /// Verify credentials and issue a session token.
    async fn login(&self, credentials: LoginCredentials) -> Result<IssuedToken, Error>;
}
