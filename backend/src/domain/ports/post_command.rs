//! Driving ports for post use-cases.

use async_trait::async_trait;

use crate::domain::{Error, PageRequest, Post, PostDraft, PostId, UserId};

/// Mutating post use-cases. Every method takes the caller's subject id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Publish a post owned by the caller.
    async fn create(&self, caller: UserId, draft: PostDraft) -> Result<Post, Error>;

    /// Edit a post the caller owns.
    async fn update(&self, caller: UserId, id: PostId, draft: PostDraft) -> Result<Post, Error>;

    /// Delete a post the caller owns, together with its comments.
    async fn delete(&self, caller: UserId, id: PostId) -> Result<(), Error>;
}

/// Read-only post use-cases; no identity required.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostQuery: Send + Sync {
    /// Fetch one post.
    async fn get(&self, id: PostId) -> Result<Post, Error>;

    /// List posts newest first.
    async fn list(&self, page: PageRequest) -> Result<Vec<Post>, Error>;

    /// List one author's posts newest first; unknown authors have none.
    async fn list_by_owner(&self, owner: UserId, page: PageRequest) -> Result<Vec<Post>, Error>;
}
