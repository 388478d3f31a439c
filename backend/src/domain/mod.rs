//! Domain primitives, ports and services.
//!
//! Purpose: hold the ownership rules and the typed error taxonomy, free of
//! HTTP and SQL concerns. Adapters depend on this module; it depends on none
//! of them.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Post and Comment value types with validating constructors.
//! - Services: [`AccountService`], [`PostService`], [`CommentService`].

pub mod account_service;
pub mod auth;
pub mod comment;
pub mod comment_service;
pub mod error;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod session;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{AuthValidationError, LoginCredentials, Password, Registration};
pub use self::comment::{
    Comment, CommentBody, CommentDraft, CommentId, CommentValidationError,
};
pub use self::comment_service::CommentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::post::{PageRequest, Post, PostDraft, PostId, PostValidationError};
pub use self::post_service::PostService;
pub use self::session::{IssuedToken, SessionClaims, TokenError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, NewUserAccount, UserAccount, UserId, UserValidationError, Username,
};
