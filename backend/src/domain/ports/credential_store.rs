//! Driven port for persisted user credentials.

use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUserAccount, UserAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential store adapters.
    pub enum CredentialStoreError {
        /// Another account already uses the email address.
        DuplicateEmail => "an account with this email already exists",
        /// Store connection could not be established.
        Connection { message: String } => "credential store connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "credential store query failed: {message}",
    }
}

/// Port for saving and looking up user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist a new account and return its id.
    async fn save(&self, account: &NewUserAccount) -> Result<UserId, CredentialStoreError>;

    /// Look up an account by its (normalised) email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, CredentialStoreError>;
}
