//! Driven ports for post persistence, split by capability.

use async_trait::async_trait;

use crate::domain::{PageRequest, Post, PostDraft, PostId, UserId};

use super::{OwnedMutation, define_port_error};

define_port_error! {
    /// Errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
}

/// Read access to posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostReader: Send + Sync {
    /// Load a post by id.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// List posts newest first.
    async fn list(&self, page: PageRequest) -> Result<Vec<Post>, PostRepositoryError>;

    /// List posts written by `owner`, newest first.
    async fn list_by_owner(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> Result<Vec<Post>, PostRepositoryError>;
}

/// Write access to posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostWriter: Send + Sync {
    /// Insert a post owned by `owner` with a zero comment count.
    async fn create(&self, owner: UserId, draft: &PostDraft) -> Result<Post, PostRepositoryError>;

    /// Replace title and content if `owner` owns the post.
    async fn update_owned(
        &self,
        id: PostId,
        owner: UserId,
        draft: &PostDraft,
    ) -> Result<OwnedMutation<Post>, PostRepositoryError>;

    /// Delete the post and its comments if `owner` owns the post.
    async fn delete_owned(
        &self,
        id: PostId,
        owner: UserId,
    ) -> Result<OwnedMutation<()>, PostRepositoryError>;
}
