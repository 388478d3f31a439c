//! Shared validation helpers for inbound HTTP adapters.
//!
//! Domain validation errors become `400 invalid_request` responses whose
//! details name the offending field and a stable reason code.

use serde_json::json;

use crate::domain::{
    AuthValidationError, CommentValidationError, Error, PostValidationError, UserValidationError,
};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: FieldName,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn with_code(self, code: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field.as_str(),
            "code": code,
        }))
    }
}

pub(crate) fn post_validation_error(error: PostValidationError) -> Error {
    ValidationError::new(FieldName::new(error.field()), error.to_string()).with_code(error.code())
}

pub(crate) fn comment_validation_error(error: CommentValidationError) -> Error {
    ValidationError::new(FieldName::new(error.field()), error.to_string()).with_code(error.code())
}

pub(crate) fn auth_validation_error(error: AuthValidationError) -> Error {
    ValidationError::new(FieldName::new(error.field()), error.to_string()).with_code(error.code())
}

/// Rejection for a user id given in a path or query parameter.
pub(crate) fn user_id_error(field: FieldName, error: UserValidationError) -> Error {
    ValidationError::new(field, error.to_string()).with_code("invalid_id")
}

/// Rejection for a request body, query string or path that failed to
/// deserialise.
pub(crate) fn malformed_input_error(field: FieldName, detail: impl std::fmt::Display) -> Error {
    ValidationError::new(field, format!("malformed {}: {detail}", field.as_str()))
        .with_code("malformed")
}
