//! Driven port for one-way password hashing.

use crate::domain::Password;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing the password failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Port for hashing new passwords and verifying presented ones.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted, self-describing hash string.
    fn hash(&self, password: &Password) -> Result<String, PasswordHashError>;

    /// Check a presented password against a stored hash.
    fn verify(&self, password: &Password, stored_hash: &str) -> Result<bool, PasswordHashError>;
}
