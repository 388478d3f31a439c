//! PostgreSQL-backed comment reader and writer.
//!
//! Creating or deleting a comment and adjusting `posts.comments_count` happen
//! in one transaction, always as `comments_count = comments_count ± 1`.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{
    CommentCreation, CommentReader, CommentRepositoryError, CommentWriter, OwnedMutation,
};
use crate::domain::{Comment, CommentBody, CommentDraft, CommentId, PostId, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CommentRow, NewCommentRow};
use super::pool::DbPool;
use super::schema::{comments, posts};

/// Diesel-backed implementation of [`CommentReader`] and [`CommentWriter`].
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, AsyncPgConnection>, CommentRepositoryError> {
        self.pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CommentRepositoryError::connection))
    }
}

fn map_error(error: diesel::result::Error) -> CommentRepositoryError {
    map_diesel_error(
        error,
        CommentRepositoryError::query,
        CommentRepositoryError::connection,
    )
}

fn row_to_comment(row: CommentRow) -> Result<Comment, CommentRepositoryError> {
    let corrupt = |what: &str| {
        CommentRepositoryError::query(format!("stored comment {} has invalid {what}", row.id))
    };
    Ok(Comment {
        id: CommentId::new(row.id).map_err(|_| corrupt("id"))?,
        post_id: PostId::new(row.post_id).map_err(|_| corrupt("post id"))?,
        owner: UserId::new(row.user_id).map_err(|_| corrupt("owner"))?,
        content: row.content,
    })
}

async fn classify_miss<T>(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> Result<OwnedMutation<T>, diesel::result::Error> {
    let exists = comments::table
        .filter(comments::id.eq(id))
        .select(comments::id)
        .first::<i64>(conn)
        .await
        .optional()?;
    Ok(match exists {
        Some(_) => OwnedMutation::NotAllowed,
        None => OwnedMutation::NotFound,
    })
}

#[async_trait]
impl CommentReader for DieselCommentRepository {
    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut conn = self.connection().await?;
        let row = comments::table
            .filter(comments::id.eq(id.get()))
            .select(CommentRow::as_select())
            .first::<CommentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_comment).transpose()
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.connection().await?;
        let rows: Vec<CommentRow> = comments::table
            .filter(comments::post_id.eq(post_id.get()))
            .order((comments::created_at.desc(), comments::id.desc()))
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows.into_iter().map(row_to_comment).collect()
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.connection().await?;
        let rows: Vec<CommentRow> = comments::table
            .filter(comments::user_id.eq(owner.get()))
            .order((comments::created_at.desc(), comments::id.desc()))
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows.into_iter().map(row_to_comment).collect()
    }
}

#[async_trait]
impl CommentWriter for DieselCommentRepository {
    async fn create_counted(
        &self,
        owner: UserId,
        draft: &CommentDraft,
    ) -> Result<CommentCreation, CommentRepositoryError> {
        let mut conn = self.connection().await?;
        let row = NewCommentRow {
            post_id: draft.post_id.get(),
            user_id: owner.get(),
            content: draft.body.as_ref(),
        };

        let stored = conn
            .transaction(|conn| {
                async move {
                    // Locks the parent row until commit.
                    let bumped = diesel::update(posts::table.filter(posts::id.eq(row.post_id)))
                        .set(posts::comments_count.eq(posts::comments_count + 1))
                        .returning(posts::id)
                        .get_result::<i64>(conn)
                        .await
                        .optional()?;
                    if bumped.is_none() {
                        return Ok(None);
                    }

                    diesel::insert_into(comments::table)
                        .values(&row)
                        .returning(CommentRow::as_returning())
                        .get_result::<CommentRow>(conn)
                        .await
                        .map(Some)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_error)?;

        match stored {
            Some(row) => row_to_comment(row).map(CommentCreation::Created),
            None => Ok(CommentCreation::MissingPost),
        }
    }

    async fn update_owned(
        &self,
        id: CommentId,
        owner: UserId,
        body: &CommentBody,
    ) -> Result<OwnedMutation<Comment>, CommentRepositoryError> {
        let mut conn = self.connection().await?;
        let (id, owner) = (id.get(), owner.get());
        let content = body.as_ref();

        let outcome = conn
            .transaction(|conn| {
                async move {
                    let updated = diesel::update(
                        comments::table
                            .filter(comments::id.eq(id).and(comments::user_id.eq(owner))),
                    )
                    .set((
                        comments::content.eq(content),
                        comments::updated_at.eq(Utc::now()),
                    ))
                    .returning(CommentRow::as_returning())
                    .get_result::<CommentRow>(conn)
                    .await
                    .optional()?;
                    match updated {
                        Some(row) => Ok(OwnedMutation::Applied(row)),
                        None => classify_miss(conn, id).await,
                    }
                }
                .scope_boxed()
            })
            .await
            .map_err(map_error)?;

        match outcome {
            OwnedMutation::Applied(row) => row_to_comment(row).map(OwnedMutation::Applied),
            OwnedMutation::NotFound => Ok(OwnedMutation::NotFound),
            OwnedMutation::NotAllowed => Ok(OwnedMutation::NotAllowed),
        }
    }

    async fn delete_counted(
        &self,
        id: CommentId,
        owner: UserId,
    ) -> Result<OwnedMutation<()>, CommentRepositoryError> {
        let mut conn = self.connection().await?;
        let (id, owner) = (id.get(), owner.get());

        conn.transaction(|conn| {
            async move {
                let parent = diesel::delete(
                    comments::table.filter(comments::id.eq(id).and(comments::user_id.eq(owner))),
                )
                .returning(comments::post_id)
                .get_result::<i64>(conn)
                .await
                .optional()?;
                let Some(post_id) = parent else {
                    return classify_miss(conn, id).await;
                };

                diesel::update(posts::table.filter(posts::id.eq(post_id)))
                    .set(posts::comments_count.eq(posts::comments_count - 1))
                    .execute(conn)
                    .await?;
                Ok(OwnedMutation::Applied(()))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_error)
    }
}
