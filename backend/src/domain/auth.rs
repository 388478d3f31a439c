//! Registration and login inputs.
//!
//! Handlers convert request bodies into these types before calling the
//! account service, so the service only ever sees validated values.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{EmailAddress, UserValidationError, Username};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN: usize = 8;
/// Maximum accepted password length, in characters.
pub const PASSWORD_MAX: usize = 128;

/// Validation failures for registration and login payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// The username failed validation.
    Username(UserValidationError),
    /// The email failed validation.
    Email(UserValidationError),
    /// Password was empty.
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
    /// Password longer than [`PASSWORD_MAX`].
    PasswordTooLong { max: usize },
}

impl AuthValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Username(_) => "username",
            Self::Email(_) => "email",
            Self::EmptyPassword | Self::PasswordTooShort { .. } | Self::PasswordTooLong { .. } => {
                "password"
            }
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Username(UserValidationError::EmptyUsername)
            | Self::Email(UserValidationError::EmptyEmail)
            | Self::EmptyPassword => "empty",
            Self::Username(UserValidationError::UsernameTooShort { .. })
            | Self::PasswordTooShort { .. } => "too_short",
            Self::Username(UserValidationError::UsernameTooLong { .. })
            | Self::Email(UserValidationError::EmailTooLong { .. })
            | Self::PasswordTooLong { .. } => "too_long",
            Self::Username(_) | Self::Email(_) => "invalid_format",
        }
    }
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(err) | Self::Email(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for AuthValidationError {}

/// Plain-text password held only for the duration of a request.
///
/// Whitespace is preserved and the buffer is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    fn for_registration(raw: &str) -> Result<Self, AuthValidationError> {
        let length = raw.chars().count();
        if length == 0 {
            return Err(AuthValidationError::EmptyPassword);
        }
        if length < PASSWORD_MIN {
            return Err(AuthValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(AuthValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    fn for_login(raw: &str) -> Result<Self, AuthValidationError> {
        if raw.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the secret for hashing or verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Validated registration request.
///
/// # Examples
/// ```
/// use blog_backend::domain::Registration;
///
/// let registration = Registration::try_from_parts("ada", "Ada@X.com", "correct horse")
///     .expect("valid registration");
/// assert_eq!(registration.email().as_ref(), "ada@x.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: EmailAddress,
    password: Password,
}

impl Registration {
    /// Validate raw registration fields, reporting the first failure.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, AuthValidationError> {
        Ok(Self {
            username: Username::new(username).map_err(AuthValidationError::Username)?,
            email: EmailAddress::new(email).map_err(AuthValidationError::Email)?,
            password: Password::for_registration(password)?,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Validated login credentials.
///
/// Login does not re-apply the registration length rules to the password so
/// a rule change never locks out existing accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        Ok(Self {
            email: EmailAddress::new(email).map_err(AuthValidationError::Email)?,
            password: Password::for_login(password)?,
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}
