//! Comment entity and its validated inputs.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::post::PostId;
use super::user::UserId;

/// Minimum comment length, in characters.
pub const COMMENT_CONTENT_MIN: usize = 3;

/// Validation errors for comment inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    NonPositiveId,
    NonPositivePostId,
    EmptyContent,
    ContentTooShort { min: usize },
}

impl CommentValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NonPositiveId => "id",
            Self::NonPositivePostId => "postId",
            Self::EmptyContent | Self::ContentTooShort { .. } => "content",
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NonPositiveId | Self::NonPositivePostId => "invalid_id",
            Self::EmptyContent => "empty",
            Self::ContentTooShort { .. } => "too_short",
        }
    }
}

impl fmt::Display for CommentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "comment id must be a positive integer"),
            Self::NonPositivePostId => write!(f, "post id must be a positive integer"),
            Self::EmptyContent => write!(f, "content must not be empty"),
            Self::ContentTooShort { min } => {
                write!(f, "content must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for CommentValidationError {}

/// Store-assigned comment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct CommentId(i64);

impl CommentId {
    /// Validate and construct a [`CommentId`].
    pub fn new(id: i64) -> Result<Self, CommentValidationError> {
        if id <= 0 {
            return Err(CommentValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    /// Raw integer value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CommentId> for i64 {
    fn from(value: CommentId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for CommentId {
    type Error = CommentValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated comment text, stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody(String);

impl CommentBody {
    /// Validate comment text.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::CommentBody;
    ///
    /// assert!(CommentBody::new("nice").is_ok());
    /// assert!(CommentBody::new("ok").is_err());
    /// ```
    pub fn new(content: &str) -> Result<Self, CommentValidationError> {
        let content = content.trim();
        let length = content.chars().count();
        if length == 0 {
            return Err(CommentValidationError::EmptyContent);
        }
        if length < COMMENT_CONTENT_MIN {
            return Err(CommentValidationError::ContentTooShort {
                min: COMMENT_CONTENT_MIN,
            });
        }
        Ok(Self(content.to_owned()))
    }
}

impl AsRef<str> for CommentBody {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated input for a new comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub post_id: PostId,
    pub body: CommentBody,
}

impl CommentDraft {
    /// Validate the parent post id and comment text.
    pub fn new(post_id: i64, content: &str) -> Result<Self, CommentValidationError> {
        let post_id = PostId::new(post_id).map_err(|_| CommentValidationError::NonPositivePostId)?;
        Ok(Self {
            post_id,
            body: CommentBody::new(content)?,
        })
    }
}

/// A comment attached to a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub owner: UserId,
    pub content: String,
}
