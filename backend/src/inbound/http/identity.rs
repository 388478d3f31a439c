//! Bearer-token identity extraction.
//!
//! Handlers that need a caller take an [`AuthenticatedUser`] argument; the
//! extractor reads `Authorization: Bearer <token>`, validates it through the
//! [`SessionTokens`](crate::domain::ports::SessionTokens) port held in
//! [`HttpState`], and rejects the request with `401` otherwise. Handlers that
//! do not ask for it stay anonymous.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{Error, TokenError, UserId};
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Subject id of a caller whose token validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    /// The caller's user id.
    pub fn user_id(&self) -> UserId {
        self.0
    }
}

/// Split an `Authorization` value into its bearer token.
///
/// The scheme match is case-insensitive. Any other scheme or an empty token
/// is malformed.
fn bearer_token(value: &str) -> Result<&str, TokenError> {
    let (scheme, token) = value
        .trim()
        .split_once(char::is_whitespace)
        .ok_or(TokenError::Malformed)?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(TokenError::Malformed);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::Malformed);
    }
    Ok(token)
}

fn rejection(error: &TokenError) -> Error {
    Error::unauthorized(error.to_string())
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))?;

    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return Err(Error::unauthorized("authentication required"));
    };
    let raw = header
        .to_str()
        .map_err(|_| rejection(&TokenError::Malformed))?;
    let token = bearer_token(raw).map_err(|err| rejection(&err))?;

    let claims = state.tokens.validate(token).map_err(|err| {
        debug!(reason = %err, "rejected bearer token");
        rejection(&err)
    })?;
    debug!(user_id = %claims.subject, username = %claims.username, "authenticated request");
    Ok(AuthenticatedUser(claims.subject))
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
