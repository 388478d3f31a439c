//! Post domain service.
//!
//! Reads are open to everyone. Writes carry the caller's subject id and the
//! repository applies them only when the caller owns the post.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    PostCommand, PostQuery, PostReader, PostRepositoryError, PostWriter,
};
use crate::domain::{Error, PageRequest, Post, PostDraft, PostId, UserId};

pub(crate) fn map_post_repository_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
    }
}

/// Service implementing [`PostCommand`] and [`PostQuery`].
#[derive(Clone)]
pub struct PostService<R, W> {
    reader: Arc<R>,
    writer: Arc<W>,
}

impl<R, W> PostService<R, W> {
    /// Create a service over the given read and write adapters.
    pub fn new(reader: Arc<R>, writer: Arc<W>) -> Self {
        Self { reader, writer }
    }
}

#[async_trait]
impl<R, W> PostCommand for PostService<R, W>
where
    R: PostReader,
    W: PostWriter,
{
    async fn create(&self, caller: UserId, draft: PostDraft) -> Result<Post, Error> {
        let post = self
            .writer
            .create(caller, &draft)
            .await
            .map_err(map_post_repository_error)?;
        debug!(post_id = %post.id, owner = %caller, "post created");
        Ok(post)
    }

    async fn update(&self, caller: UserId, id: PostId, draft: PostDraft) -> Result<Post, Error> {
        self.writer
            .update_owned(id, caller, &draft)
            .await
            .map_err(map_post_repository_error)?
            .into_result("post", id)
    }

    async fn delete(&self, caller: UserId, id: PostId) -> Result<(), Error> {
        self.writer
            .delete_owned(id, caller)
            .await
            .map_err(map_post_repository_error)?
            .into_result("post", id)?;
        debug!(post_id = %id, owner = %caller, "post deleted");
        Ok(())
    }
}

#[async_trait]
impl<R, W> PostQuery for PostService<R, W>
where
    R: PostReader,
    W: PostWriter,
{
    async fn get(&self, id: PostId) -> Result<Post, Error> {
        self.reader
            .find_by_id(id)
            .await
            .map_err(map_post_repository_error)?
            .ok_or_else(|| Error::not_found(format!("post {id} not found")))
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Post>, Error> {
        self.reader
            .list(page)
            .await
            .map_err(map_post_repository_error)
    }

    async fn list_by_owner(&self, owner: UserId, page: PageRequest) -> Result<Vec<Post>, Error> {
        self.reader
            .list_by_owner(owner, page)
            .await
            .map_err(map_post_repository_error)
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
