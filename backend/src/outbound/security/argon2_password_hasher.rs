//! Argon2id implementation of the `PasswordHasher` port.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordVerifier, Version};

use crate::domain::Password;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2id hasher producing PHC strings such as
/// `$argon2id$v=19$m=19456,t=2,p=1$...`.
///
/// Verification reads the parameters from the stored hash, so hashes made
/// with other costs still verify.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a hasher with explicit memory (KiB), iteration and lane costs.
    pub fn with_costs(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, PasswordHashError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &Password) -> Result<String, PasswordHashError> {
        use argon2::PasswordHasher as _;

        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &Password, stored_hash: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
        match self
            .argon2
            .verify_password(password.expose().as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::LoginCredentials;

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_costs(1024, 1, 1).expect("valid costs")
    }

    fn password(raw: &str) -> Password {
        LoginCredentials::try_from_parts("ada@example.com", raw)
            .expect("valid credentials")
            .password()
            .clone()
    }

    #[rstest]
    fn hash_round_trips_and_rejects_other_passwords(hasher: Argon2PasswordHasher) {
        let stored = hasher.hash(&password("correct horse")).expect("hash");

        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("correct horse"));
        assert!(hasher.verify(&password("correct horse"), &stored).expect("verify"));
        assert!(!hasher.verify(&password("battery staple"), &stored).expect("verify"));
    }

    #[rstest]
    fn same_password_gets_fresh_salt(hasher: Argon2PasswordHasher) {
        let first = hasher.hash(&password("correct horse")).expect("hash");
        let second = hasher.hash(&password("correct horse")).expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    fn malformed_hash_is_an_error(hasher: Argon2PasswordHasher) {
        let err = hasher
            .verify(&password("correct horse"), "plaintext")
            .expect_err("not a PHC string");
        assert!(matches!(err, PasswordHashError::MalformedHash { .. }));
    }

    #[rstest]
    fn unknown_email_placeholder_is_a_real_hash(hasher: Argon2PasswordHasher) {
        let matched = hasher
            .verify(
                &password("correct horse"),
                crate::domain::account_service::DUMMY_PASSWORD_HASH,
            )
            .expect("placeholder parses");
        assert!(!matched);
    }

    #[rstest]
    fn zero_lanes_are_rejected() {
        assert!(Argon2PasswordHasher::with_costs(1024, 1, 0).is_err());
    }
}
