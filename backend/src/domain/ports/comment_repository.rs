//! Driven ports for comment persistence.
//!
//! The writer owns the comment-count invariant: every method that adds or
//! removes a comment adjusts the parent post's counter in the same atomic
//! unit, using a relative update.

use async_trait::async_trait;

use crate::domain::{Comment, CommentBody, CommentDraft, CommentId, PostId, UserId};

use super::{OwnedMutation, define_port_error};

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

/// Outcome of inserting a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentCreation {
    /// Comment stored and parent counter incremented.
    Created(Comment),
    /// The parent post does not exist; nothing was written.
    MissingPost,
}

/// Read access to comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentReader: Send + Sync {
    /// Load a comment by id.
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError>;

    /// List a post's comments newest first.
    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentRepositoryError>;

    /// List comments written by `owner` across all posts, newest first.
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Comment>, CommentRepositoryError>;
}

/// Write access to comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentWriter: Send + Sync {
    /// Insert a comment and increment the parent's count atomically.
    async fn create_counted(
        &self,
        owner: UserId,
        draft: &CommentDraft,
    ) -> Result<CommentCreation, CommentRepositoryError>;

    /// Replace the text if `owner` owns the comment.
    async fn update_owned(
        &self,
        id: CommentId,
        owner: UserId,
        body: &CommentBody,
    ) -> Result<OwnedMutation<Comment>, CommentRepositoryError>;

    /// Delete the comment and decrement the parent's count atomically if
    /// `owner` owns the comment.
    async fn delete_counted(
        &self,
        id: CommentId,
        owner: UserId,
    ) -> Result<OwnedMutation<()>, CommentRepositoryError>;
}
