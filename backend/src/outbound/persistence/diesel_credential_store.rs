//! PostgreSQL-backed `CredentialStore` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CredentialStore, CredentialStoreError};
use crate::domain::{EmailAddress, NewUserAccount, UserAccount, UserId, Username};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed credential store.
#[derive(Clone)]
pub struct DieselCredentialStore {
    pool: DbPool,
}

impl DieselCredentialStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_store_error(error: diesel::result::Error) -> CredentialStoreError {
    if is_unique_violation(&error) {
        return CredentialStoreError::duplicate_email();
    }
    map_diesel_error(
        error,
        CredentialStoreError::query,
        CredentialStoreError::connection,
    )
}

fn row_to_account(row: UserRow) -> Result<UserAccount, CredentialStoreError> {
    let invalid = |err: crate::domain::UserValidationError| {
        CredentialStoreError::query(format!("stored user {} is invalid: {err}", row.id))
    };
    Ok(UserAccount {
        id: UserId::new(row.id).map_err(invalid)?,
        username: Username::new(&row.username).map_err(invalid)?,
        email: EmailAddress::new(&row.email).map_err(invalid)?,
        password_hash: row.password_hash,
    })
}

#[async_trait]
impl CredentialStore for DieselCredentialStore {
    async fn save(&self, account: &NewUserAccount) -> Result<UserId, CredentialStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CredentialStoreError::connection))?;

        let row = NewUserRow {
            username: account.username.as_ref(),
            email: account.email.as_ref(),
            password_hash: &account.password_hash,
        };

        let id: i64 = diesel::insert_into(users::table)
            .values(&row)
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(map_store_error)?;

        UserId::new(id).map_err(|err| CredentialStoreError::query(err.to_string()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, CredentialStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CredentialStoreError::connection))?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_store_error)?;

        row.map(row_to_account).transpose()
    }
}
