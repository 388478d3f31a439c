//! Comment domain service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::post_service::map_post_repository_error;
use crate::domain::ports::{
    CommentCommand, CommentCreation, CommentQuery, CommentReader, CommentRepositoryError,
    CommentWriter, PostReader,
};
use crate::domain::{Comment, CommentBody, CommentDraft, CommentId, Error, PostId, UserId};

fn map_repository_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentRepositoryError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
    }
}

fn missing_post(id: PostId) -> Error {
    Error::not_found(format!("post {id} not found"))
}

/// Service implementing [`CommentCommand`] and [`CommentQuery`].
///
/// Comment counts are maintained by the [`CommentWriter`]; this service never
/// touches them directly.
#[derive(Clone)]
pub struct CommentService<P, R, W> {
    posts: Arc<P>,
    reader: Arc<R>,
    writer: Arc<W>,
}

impl<P, R, W> CommentService<P, R, W> {
    /// Create a service over the post reader and comment adapters.
    pub fn new(posts: Arc<P>, reader: Arc<R>, writer: Arc<W>) -> Self {
        Self {
            posts,
            reader,
            writer,
        }
    }
}

#[async_trait]
impl<P, R, W> CommentCommand for CommentService<P, R, W>
where
    P: PostReader,
    R: CommentReader,
    W: CommentWriter,
{
    async fn create(&self, caller: UserId, draft: CommentDraft) -> Result<Comment, Error> {
        let post_id = draft.post_id;
        match self
            .writer
            .create_counted(caller, &draft)
            .await
            .map_err(map_repository_error)?
        {
            CommentCreation::Created(comment) => {
                debug!(comment_id = %comment.id, post_id = %post_id, "comment created");
                Ok(comment)
            }
            CommentCreation::MissingPost => Err(missing_post(post_id)),
        }
    }

    async fn update(
        &self,
        caller: UserId,
        id: CommentId,
        body: CommentBody,
    ) -> Result<Comment, Error> {
        self.writer
            .update_owned(id, caller, &body)
            .await
            .map_err(map_repository_error)?
            .into_result("comment", id)
    }

    async fn delete(&self, caller: UserId, id: CommentId) -> Result<(), Error> {
        self.writer
            .delete_counted(id, caller)
            .await
            .map_err(map_repository_error)?
            .into_result("comment", id)?;
        debug!(comment_id = %id, "comment deleted");
        Ok(())
    }
}

#[async_trait]
impl<P, R, W> CommentQuery for CommentService<P, R, W>
where
    P: PostReader,
    R: CommentReader,
    W: CommentWriter,
{
    async fn get(&self, id: CommentId) -> Result<Comment, Error> {
        self.reader
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("comment {id} not found")))
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, Error> {
        self.posts
            .find_by_id(post_id)
            .await
            .map_err(map_post_repository_error)?
            .ok_or_else(|| missing_post(post_id))?;

        self.reader
            .list_for_post(post_id)
            .await
            .map_err(map_repository_error)
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Comment>, Error> {
        self.reader
            .list_by_owner(owner)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "comment_service_tests.rs"]
mod tests;
