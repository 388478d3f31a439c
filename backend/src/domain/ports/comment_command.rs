//! Driving ports for comment use-cases.

use async_trait::async_trait;

use crate::domain::{Comment, CommentBody, CommentDraft, CommentId, Error, PostId, UserId};

/// Mutating comment use-cases. Every method takes the caller's subject id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentCommand: Send + Sync {
    /// Attach a comment owned by the caller to an existing post.
    async fn create(&self, caller: UserId, draft: CommentDraft) -> Result<Comment, Error>;

    /// Edit a comment the caller owns.
    async fn update(
        &self,
        caller: UserId,
        id: CommentId,
        body: CommentBody,
    ) -> Result<Comment, Error>;

    /// Delete a comment the caller owns.
    async fn delete(&self, caller: UserId, id: CommentId) -> Result<(), Error>;
}

/// Read-only comment use-cases; no identity required.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentQuery: Send + Sync {
    /// Fetch one comment.
    async fn get(&self, id: CommentId) -> Result<Comment, Error>;

    /// List the comments of an existing post.
    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, Error>;

    /// List one author's comments newest first.
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Comment>, Error>;
}
