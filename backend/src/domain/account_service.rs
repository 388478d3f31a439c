//! Account service: registration and credential login.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::ports::{
    AccountCommand, CredentialStore, CredentialStoreError, PasswordHashError, PasswordHasher,
    SessionTokens,
};
use crate::domain::{
    Error, IssuedToken, LoginCredentials, NewUserAccount, Password, Registration, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Verified against when the email is unknown so both rejections cost one
/// Argon2 run. Uses the default production costs.
pub(crate) const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$YmxvZy1kdW1teS1zYWx0IQ$AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8";

fn map_store_error(error: CredentialStoreError) -> Error {
    match error {
        CredentialStoreError::DuplicateEmail => {
            Error::conflict("an account with this email already exists")
                .with_details(json!({ "field": "email", "code": "duplicate" }))
        }
        CredentialStoreError::Connection { message } => {
            Error::service_unavailable(format!("credential store unavailable: {message}"))
        }
        CredentialStoreError::Query { message } => {
            Error::internal(format!("credential store error: {message}"))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

/// Service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<S> {
    store: Arc<S>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn SessionTokens>,
}

impl<S> AccountService<S> {
    /// Create the service from its collaborators.
    pub fn new(
        store: Arc<S>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn SessionTokens>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    async fn hash_password(&self, password: Password) -> Result<String, Error> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hash_error)
    }

    async fn verify_password(&self, password: Password, stored_hash: String) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
            .map_err(map_hash_error)
    }
}

#[async_trait]
impl<S> AccountCommand for AccountService<S>
where
    S: CredentialStore,
{
    async fn register(&self, registration: Registration) -> Result<UserId, Error> {
        let password_hash = self.hash_password(registration.password().clone()).await?;
        let account = NewUserAccount {
            username: registration.username().clone(),
            email: registration.email().clone(),
            password_hash,
        };

        let id = self.store.save(&account).await.map_err(map_store_error)?;
        debug!(user_id = %id, "account registered");
        Ok(id)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<IssuedToken, Error> {
        let account = self
            .store
            .find_by_email(credentials.email())
            .await
            .map_err(map_store_error)?;

        let Some(account) = account else {
            let password = credentials.password().clone();
            if let Err(err) = self
                .verify_password(password, DUMMY_PASSWORD_HASH.to_owned())
                .await
            {
                debug!(error = %err, "dummy password verification failed");
            }
            warn!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .verify_password(credentials.password().clone(), account.password_hash.clone())
            .await?;
        if !matches {
            warn!(user_id = %account.id, "login rejected: wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let issued = self
            .tokens
            .issue(&account)
            .map_err(|err| Error::internal(err.to_string()))?;
        debug!(user_id = %account.id, "session token issued");
        Ok(issued)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
