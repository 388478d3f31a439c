//! HS256 JWT implementation of the `SessionTokens` port.
//!
//! Claims: `uid` (numeric user id), `username`, `email`, `iat` and `exp`
//! (Unix seconds). Expiry is checked against the injected clock rather than
//! the system time so it can be tested deterministically.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{SessionTokens, TokenIssueError};
use crate::domain::{
    EmailAddress, IssuedToken, SessionClaims, TokenError, UserAccount, UserId, Username,
};

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    uid: i64,
    username: String,
    email: String,
    iat: i64,
    exp: i64,
}

impl WireClaims {
    fn into_session(self) -> Result<SessionClaims, TokenError> {
        Ok(SessionClaims {
            subject: UserId::new(self.uid).map_err(|_| TokenError::Malformed)?,
            username: Username::new(&self.username).map_err(|_| TokenError::Malformed)?,
            email: EmailAddress::new(&self.email).map_err(|_| TokenError::Malformed)?,
            issued_at: DateTime::from_timestamp(self.iat, 0).ok_or(TokenError::Malformed)?,
            expires_at: DateTime::from_timestamp(self.exp, 0).ok_or(TokenError::Malformed)?,
        })
    }
}

/// Signs and validates session tokens with a shared secret.
pub struct JwtSessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl JwtSessionTokens {
    /// Create a token service for `secret`, issuing tokens valid for `ttl`.
    pub fn new(secret: &[u8], ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        }
    }
}

impl SessionTokens for JwtSessionTokens {
    fn issue(&self, account: &UserAccount) -> Result<IssuedToken, TokenIssueError> {
        let now = self.clock.utc();
        let expires_at = DateTime::from_timestamp((now + self.ttl).timestamp(), 0)
            .ok_or_else(|| TokenIssueError::signing("token expiry out of range"))?;

        let claims = WireClaims {
            uid: account.id.get(),
            username: account.username.to_string(),
            email: account.email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|err| TokenIssueError::signing(err.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    fn validate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let header = jsonwebtoken::decode_header(token).map_err(|_| TokenError::Malformed)?;
        if header.alg != ALGORITHM {
            debug!(alg = ?header.alg, "rejected token signed with unexpected algorithm");
            return Err(TokenError::WrongAlgorithm);
        }

        let data = decode::<WireClaims>(token, &self.decoding, &self.validation).map_err(|err| {
            debug!(error = %err, "rejected malformed token");
            TokenError::Malformed
        })?;

        if self.clock.utc().timestamp() > data.claims.exp {
            return Err(TokenError::Expired);
        }
        data.claims.into_session()
    }
}

#[cfg(test)]
#[path = "jwt_session_tokens_tests.rs"]
mod tests;
